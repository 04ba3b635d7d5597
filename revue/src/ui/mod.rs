//! UI rendering module for revue.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`; each tab
//! and panel has its own module.

mod layout;
pub mod help;
pub mod history;
pub mod keybindings;
pub mod preview;
pub mod results;
pub mod samples;
pub mod upload;

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
};

use crate::app::{AppState, Mode, Tab};
use crate::background::Particle;
use crate::theme::Theme;
use layout::{compute_chrome, compute_review_layout, inner_rect, render_status_bar, render_tab_bar};

/// Renders one complete frame: particle backdrop, tab bar, the active tab,
/// status bar, and the help overlay when open.
///
/// Viewport heights and panel rects are written back into `state` so the next
/// keypress can page and hit-test against what is on screen.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme, particles: &[Particle]) {
    let [tab_bar, body, status_bar] = compute_chrome(frame.area());

    render_particles(frame, body, particles, theme);
    render_tab_bar(frame, tab_bar, state, theme);

    match state.tab {
        Tab::Review => {
            let [upload_area, preview_area, results_area] = compute_review_layout(body);
            state.preview_viewport_height = inner_rect(preview_area).height;
            state.results_viewport_height = inner_rect(results_area).height;
            state.panel_rects = [preview_area, results_area];

            upload::render_upload(frame, upload_area, state, theme);
            preview::render_preview(frame, preview_area, state, theme);
            results::render_results(frame, results_area, state, theme);
        }
        Tab::History => history::render_history(frame, body, state, theme),
        Tab::Samples => samples::render_samples(frame, body, state, theme),
    }

    render_status_bar(frame, status_bar, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}

/// Fills `area` with the theme background and paints the particle field,
/// scaling the 0..100 coordinates to cells.
fn render_particles(frame: &mut Frame, area: Rect, particles: &[Particle], theme: &Theme) {
    if area.is_empty() {
        return;
    }
    let buf = frame.buffer_mut();
    buf.set_style(area, Style::default().bg(theme.background));
    for p in particles {
        let col = ((p.x / 100.0) * f32::from(area.width)) as u16;
        let row = ((p.y / 100.0) * f32::from(area.height)) as u16;
        let pos = Position {
            x: area.x + col.min(area.width - 1),
            y: area.y + row.min(area.height - 1),
        };
        let mut style = Style::default().fg(theme.particles[p.tint % theme.particles.len()]);
        if p.opacity < 0.25 {
            style = style.add_modifier(Modifier::DIM);
        }
        if let Some(cell) = buf.cell_mut(pos) {
            cell.set_char(p.glyph()).set_style(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::ParticleField;
    use ratatui::{backend::TestBackend, Terminal};
    use rand::{rngs::StdRng, SeedableRng};
    use revue_core::{sample_outcome, IntakePolicy, UploadedFile};

    fn draw(state: &mut AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let particles = ParticleField::new(15, &mut StdRng::seed_from_u64(3));
        terminal
            .draw(|f| render(f, state, &Theme::dark(), particles.particles()))
            .unwrap();
        let buf = terminal.backend().buffer();
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn empty_review_tab_renders_prompts() {
        let mut state = AppState::new(IntakePolicy::default(), "mock");
        let screen = draw(&mut state, 140, 40);
        assert!(screen.contains("Upload a file to get a review"));
        assert!(screen.contains("No file loaded"));
        assert!(screen.contains("EMPTY"));
        assert!(state.preview_viewport_height > 0);
    }

    #[test]
    fn completed_review_renders_score_and_preview() {
        let mut state = AppState::new(IntakePolicy::default(), "mock");
        let t = state.session.begin_intake();
        let file = UploadedFile::new("utils.py", "def f():\n    return 1\n");
        let _ = state.session.accept_file(t, file);
        let t = state.session.request_analysis().unwrap();
        let _ = state.session.complete_analysis(t, Ok(sample_outcome()));

        let screen = draw(&mut state, 140, 40);
        assert!(screen.contains("7.5/10"));
        assert!(screen.contains("[python]"));
        assert!(screen.contains("return 1"));
    }

    #[test]
    fn narrow_terminal_does_not_panic() {
        let mut state = AppState::new(IntakePolicy::default(), "mock");
        state.mode = Mode::HelpOverlay;
        for (w, h) in [(1, 1), (20, 5), (49, 10), (80, 24)] {
            let _ = draw(&mut state, w, h);
        }
    }

    #[test]
    fn other_tabs_render() {
        let mut state = AppState::new(IntakePolicy::default(), "mock");
        state.tab = Tab::Samples;
        assert!(draw(&mut state, 100, 30).contains("react-component.jsx"));
        state.tab = Tab::History;
        assert!(draw(&mut state, 100, 30).contains("No reviews yet"));
    }

    #[test]
    fn large_file_renders_plain_without_highlighting() {
        let mut state = AppState::new(IntakePolicy::default(), "mock");
        let line = "def handler(event, context):  # process one record and return it\n";
        let content = line.repeat(4 * 1024 * 1024 / line.len());
        let t = state.session.begin_intake();
        let _ = state.session.accept_file(t, UploadedFile::new("big.py", content));

        let screen = draw(&mut state, 140, 40);
        assert!(screen.contains("def handler(event, context)"));
        assert!(!state.preview_highlighted());
        assert!(state
            .preview_lines()
            .iter()
            .take(50)
            .flat_map(|l| &l.spans)
            .all(|s| s.style.fg.is_none()));
    }
}
