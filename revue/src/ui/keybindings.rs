//! Keybinding dispatcher for revue.
//!
//! Translates raw crossterm key, mouse and paste events into `AppState`
//! mutations and returns a `KeyAction`. UI-only changes (scrolling, tabs,
//! modes) happen here; anything that touches the session or spawns work is
//! returned as an action for the event loop to hand to the
//! [`crate::dispatch::Dispatcher`].

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use revue_core::intake::normalize_dropped_path;
use revue_core::samples::SampleFile;

use crate::app::{AppState, Mode, PanelFocus, Tab};

/// What the event loop should do after a key, mouse or paste event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Nothing beyond the state change already made.
    Continue,
    Quit,
    SubmitPath(PathBuf),
    LoadSample(&'static SampleFile),
    Analyze,
    Remove,
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Dispatches a key event to the handler matching the current mode.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::PathInput => handle_path_input(key, state, home_dir().as_deref()),
        Mode::Normal => handle_normal(key, state),
    }
}

/// Handles bracketed paste. While typing a path the text is inserted; otherwise
/// it is treated as a dropped file.
pub fn handle_paste(text: &str, state: &mut AppState) -> KeyAction {
    paste_with_home(text, state, home_dir().as_deref())
}

fn paste_with_home(text: &str, state: &mut AppState, home: Option<&Path>) -> KeyAction {
    match state.mode {
        Mode::PathInput => {
            state.input.push_str(text.trim_end_matches(['\r', '\n']));
            KeyAction::Continue
        }
        Mode::HelpOverlay => KeyAction::Continue,
        Mode::Normal => match normalize_dropped_path(text, home) {
            Some(path) => KeyAction::SubmitPath(path),
            None => KeyAction::Continue,
        },
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }

    match key.code {
        KeyCode::Tab => {
            state.tab = state.tab.next();
            KeyAction::Continue
        }
        KeyCode::BackTab => {
            state.tab = state.tab.prev();
            KeyAction::Continue
        }
        KeyCode::Char(c @ '1'..='3') => {
            let idx = usize::from(c as u8 - b'1');
            state.tab = Tab::ALL[idx];
            KeyAction::Continue
        }
        KeyCode::Char('H') | KeyCode::Char('L') | KeyCode::Left | KeyCode::Right => {
            state.focus = state.focus.toggle();
            KeyAction::Continue
        }

        KeyCode::Char('o') | KeyCode::Char('i') => {
            state.input.clear();
            state.tab = Tab::Review;
            state.mode = Mode::PathInput;
            KeyAction::Continue
        }
        KeyCode::Char('a') => {
            state.tab = Tab::Review;
            KeyAction::Analyze
        }
        KeyCode::Char('x') => KeyAction::Remove,
        KeyCode::Enter if state.tab == Tab::Samples => match state.selected_sample() {
            Some(sample) => KeyAction::LoadSample(sample),
            None => KeyAction::Continue,
        },

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,

        _ => KeyAction::Continue,
    }
}

/// Handles j / k / g / G, arrows and Ctrl-d / Ctrl-u.
///
/// Returns `None` when the key should fall through to the rest of the Normal handler.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::PageDown => state.half_page_down(),
        KeyCode::PageUp => state.half_page_up(),
        KeyCode::Char('g') | KeyCode::Home => state.scroll_top(),
        KeyCode::Char('G') | KeyCode::End => state.scroll_bottom(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// PathInput mode
// ---------------------------------------------------------------------------

fn handle_path_input(key: KeyEvent, state: &mut AppState, home: Option<&Path>) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        KeyCode::Enter => {
            state.mode = Mode::Normal;
            match normalize_dropped_path(&state.input, home) {
                Some(path) => KeyAction::SubmitPath(path),
                None => {
                    state.set_error("Enter a file path");
                    KeyAction::Continue
                }
            }
        }
        KeyCode::Char('u') if ctrl => {
            state.input.clear();
            KeyAction::Continue
        }
        KeyCode::Backspace => {
            state.input.pop();
            KeyAction::Continue
        }
        KeyCode::Char(c) if !ctrl => {
            state.input.push(c);
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Left click focuses the preview or results panel; the wheel scrolls by 3 lines.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if state.tab == Tab::Review => {
            let pos = Position { x: mouse.column, y: mouse.row };
            let [preview, results] = state.panel_rects;
            if preview.contains(pos) {
                state.focus = PanelFocus::Preview;
            } else if results.contains(pos) {
                state.focus = PanelFocus::Results;
            }
        }
        MouseEventKind::ScrollUp if state.mode == Mode::HelpOverlay => {
            state.help_scroll = state.help_scroll.saturating_sub(3);
        }
        MouseEventKind::ScrollDown if state.mode == Mode::HelpOverlay => {
            state.help_scroll = state.help_scroll.saturating_add(3);
        }
        MouseEventKind::ScrollUp => state.scroll_up(3),
        MouseEventKind::ScrollDown => state.scroll_down(3),
        _ => {}
    }
    KeyAction::Continue
}
