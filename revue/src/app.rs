//! Central application state for revue.
//!
//! This module owns all mutable UI state: the current mode and tab, which panel
//! has focus, per-panel scroll offsets and viewport heights, the path input
//! buffer, and the review session itself. No ratatui rendering logic lives
//! here. `app.rs` is state that is read by the render module and mutated by the
//! keybinding dispatcher and the [`crate::dispatch::Dispatcher`].

use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::ListState;

use revue_core::history::ReviewHistory;
use revue_core::samples::{SampleFile, SAMPLES};
use revue_core::session::Generation;
use revue_core::{IntakePolicy, ReviewSession};

use crate::highlight;

/// How long a status-bar message stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(4);

/// Input mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing a file path into the upload panel.
    PathInput,
    /// Help overlay is shown above all panels.
    HelpOverlay,
}

/// Top-level tab.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Review,
    History,
    Samples,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Review, Tab::History, Tab::Samples];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Review => "Review",
            Tab::History => "History",
            Tab::Samples => "Samples",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Review => 0,
            Tab::History => 1,
            Tab::Samples => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Which panel of the Review tab receives scroll keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    #[default]
    Preview,
    Results,
}

impl PanelFocus {
    pub fn toggle(self) -> Self {
        match self {
            PanelFocus::Preview => PanelFocus::Results,
            PanelFocus::Results => PanelFocus::Preview,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    expires_at: Instant,
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    pub mode: Mode,
    pub tab: Tab,
    pub focus: PanelFocus,

    pub session: ReviewSession,
    pub history: ReviewHistory,
    /// Intake limits, shown in the upload panel.
    pub policy: IntakePolicy,
    pub analyzer_name: String,

    /// Path typed in [`Mode::PathInput`].
    pub input: String,
    pub status: Option<StatusMessage>,

    /// usize supports files longer than 65535 lines; clamped by the renderer.
    pub preview_scroll: usize,
    pub results_scroll: u16,
    pub help_scroll: u16,

    /// Inner heights after borders, cached after each render for paging.
    pub preview_viewport_height: u16,
    pub results_viewport_height: u16,

    /// Outer rects of [preview, results], cached after each render for
    /// click-to-focus.
    pub panel_rects: [Rect; 2],

    pub samples_state: ListState,
    pub history_state: ListState,

    preview_cache: Option<PreviewCache>,
}

/// Preview lines for the file of one session generation. Plain text until
/// the background highlighter delivers.
struct PreviewCache {
    generation: Generation,
    lines: Vec<Line<'static>>,
    highlighted: bool,
}

impl AppState {
    pub fn new(policy: IntakePolicy, analyzer_name: impl Into<String>) -> Self {
        Self {
            mode: Mode::default(),
            tab: Tab::default(),
            focus: PanelFocus::default(),
            session: ReviewSession::new(),
            history: ReviewHistory::default(),
            policy,
            analyzer_name: analyzer_name.into(),
            input: String::new(),
            status: None,
            preview_scroll: 0,
            results_scroll: 0,
            help_scroll: 0,
            preview_viewport_height: 0,
            results_viewport_height: 0,
            panel_rects: [Rect::default(); 2],
            samples_state: ListState::default().with_selected(Some(0)),
            history_state: ListState::default(),
            preview_cache: None,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.push_status(text.into(), false);
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.push_status(text.into(), true);
    }

    fn push_status(&mut self, text: String, is_error: bool) {
        let expires_at = Instant::now() + STATUS_TTL;
        self.status = Some(StatusMessage { text, is_error, expires_at });
    }

    /// Clears the status message once its time is up. Called on every tick.
    pub fn expire_status(&mut self, now: Instant) {
        if self.status.as_ref().is_some_and(|s| now >= s.expires_at) {
            self.status = None;
        }
    }

    /// Resets per-file view state after the session switched files.
    pub fn on_file_changed(&mut self) {
        self.preview_scroll = 0;
        self.results_scroll = 0;
        self.preview_cache = None;
    }

    /// Preview lines for the current file.
    ///
    /// Never runs syntect: on a file change this splits the content into plain
    /// lines, which [`install_highlighted`](Self::install_highlighted) later
    /// replaces.
    pub fn preview_lines(&mut self) -> &[Line<'static>] {
        let generation = self.session.generation();
        let Some(file) = self.session.file() else {
            self.preview_cache = None;
            return &[];
        };
        if self.preview_cache.as_ref().is_none_or(|c| c.generation != generation) {
            self.preview_cache = Some(PreviewCache {
                generation,
                lines: highlight::plain_source(&file.content),
                highlighted: false,
            });
        }
        match &self.preview_cache {
            Some(cache) => &cache.lines,
            None => &[],
        }
    }

    /// Swaps in highlighted lines produced for `generation`. Returns `false`
    /// when the session has moved on to another file.
    pub fn install_highlighted(
        &mut self,
        generation: Generation,
        lines: Vec<Line<'static>>,
    ) -> bool {
        if self.session.file().is_none() || generation != self.session.generation() {
            return false;
        }
        self.preview_cache = Some(PreviewCache { generation, lines, highlighted: true });
        true
    }

    pub fn preview_highlighted(&self) -> bool {
        let generation = self.session.generation();
        self.preview_cache.as_ref().is_some_and(|c| c.highlighted && c.generation == generation)
    }

    fn preview_len(&self) -> usize {
        self.session.file().map_or(0, |f| f.line_count())
    }

    /// Scrolls the focused panel (or the focused list on other tabs) down.
    pub fn scroll_down(&mut self, lines: u16) {
        match self.tab {
            Tab::Review => match self.focus {
                PanelFocus::Preview => {
                    let max = self.preview_len().saturating_sub(1);
                    self.preview_scroll =
                        self.preview_scroll.saturating_add(lines as usize).min(max);
                }
                PanelFocus::Results => {
                    self.results_scroll = self.results_scroll.saturating_add(lines);
                }
            },
            Tab::History => self.history_state.scroll_down_by(lines),
            Tab::Samples => self.samples_state.scroll_down_by(lines),
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        match self.tab {
            Tab::Review => match self.focus {
                PanelFocus::Preview => {
                    self.preview_scroll = self.preview_scroll.saturating_sub(lines as usize);
                }
                PanelFocus::Results => {
                    self.results_scroll = self.results_scroll.saturating_sub(lines);
                }
            },
            Tab::History => self.history_state.scroll_up_by(lines),
            Tab::Samples => self.samples_state.scroll_up_by(lines),
        }
    }

    pub fn scroll_top(&mut self) {
        match self.tab {
            Tab::Review => match self.focus {
                PanelFocus::Preview => self.preview_scroll = 0,
                PanelFocus::Results => self.results_scroll = 0,
            },
            Tab::History => self.history_state.select_first(),
            Tab::Samples => self.samples_state.select_first(),
        }
    }

    /// For the results panel the offset is set to `u16::MAX`; the renderer clamps.
    pub fn scroll_bottom(&mut self) {
        match self.tab {
            Tab::Review => match self.focus {
                PanelFocus::Preview => self.preview_scroll = self.preview_len().saturating_sub(1),
                PanelFocus::Results => self.results_scroll = u16::MAX,
            },
            Tab::History => self.history_state.select_last(),
            Tab::Samples => self.samples_state.select_last(),
        }
    }

    fn viewport_height(&self) -> u16 {
        match self.focus {
            PanelFocus::Preview => self.preview_viewport_height,
            PanelFocus::Results => self.results_viewport_height,
        }
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down((self.viewport_height() / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.viewport_height() / 2).max(1));
    }

    /// Bundled samples whose extension the intake policy accepts.
    pub fn visible_samples(&self) -> Vec<&'static SampleFile> {
        SAMPLES.iter().filter(|s| self.policy.is_accepted(s.name)).collect()
    }

    /// The highlighted row on the Samples tab.
    pub fn selected_sample(&self) -> Option<&'static SampleFile> {
        let visible = self.visible_samples();
        let idx = self.samples_state.selected()?.min(visible.len().checked_sub(1)?);
        visible.get(idx).copied()
    }
}
