//! Upload panel: path entry, processing state, the loaded file, and the
//! last intake error.
//!
//! The panel is not cleared before drawing so the particle background shows
//! through its empty cells.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use super::layout::panel_block;

pub fn render_upload(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let focused = state.mode == Mode::PathInput;
    let block = panel_block(" Upload ", focused, theme);
    frame.render_widget(
        Paragraph::new(upload_text(state, theme)).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn upload_text(state: &AppState, theme: &Theme) -> Text<'static> {
    let muted = Style::default().fg(theme.muted);
    let mut lines = Vec::new();

    if state.mode == Mode::PathInput {
        lines.push(Line::from(vec![
            Span::styled("Path: ", Style::default().fg(theme.primary)),
            Span::styled(state.input.clone(), Style::default().fg(theme.text)),
            Span::styled("█", Style::default().fg(theme.primary)),
        ]));
        lines.push(Line::styled("Enter load · Esc cancel · Ctrl-u clear", muted));
    } else if state.session.intake_pending() {
        lines.push(Line::styled(
            "Processing file…",
            Style::default().fg(theme.warning).add_modifier(Modifier::ITALIC),
        ));
    } else if let Some(file) = state.session.file() {
        lines.push(Line::from(vec![
            Span::styled(
                file.name.clone(),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", file.size_label()), muted),
        ]));
        if !state.policy.is_accepted(&file.name) {
            lines.push(Line::styled(
                "Not in the supported list; review may be less useful",
                Style::default().fg(theme.warning),
            ));
        }
        lines.push(Line::styled("a analyze · x remove · o open another file", muted));
    } else {
        lines.push(Line::styled(
            "Drop a file onto the terminal, or press o to type a path",
            Style::default().fg(theme.text),
        ));
        lines.push(Line::styled(
            format!(
                "Supports {} · max {}",
                state.policy.extensions_label(),
                state.policy.max_size_label()
            ),
            muted,
        ));
    }

    if let Some(err) = state.session.intake_error() {
        lines.push(Line::styled(err.to_owned(), Style::default().fg(theme.critical)));
    }
    Text::from(lines)
}
