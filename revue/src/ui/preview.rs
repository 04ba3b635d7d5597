//! Code preview panel: highlighted source with line numbers, language and
//! line-count badges in the title.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::app::{AppState, PanelFocus};
use crate::highlight;
use crate::theme::Theme;
use super::layout::{inner_rect, panel_block};

pub fn render_preview(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let focused = state.focus == PanelFocus::Preview;
    let title = match state.session.file() {
        Some(file) => Line::from(vec![
            Span::raw(format!(" {} ", file.name)),
            Span::styled(
                format!("[{}]", file.language()),
                Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} lines ", file.line_count()),
                Style::default().fg(theme.muted),
            ),
        ]),
        None => Line::raw(" Preview "),
    };

    frame.render_widget(Clear, area);
    frame.render_widget(panel_block(title, focused, theme), area);
    let inner = inner_rect(area);

    let gutter = Style::default().fg(theme.muted);
    let scroll = state.preview_scroll;
    let lines = state.preview_lines();
    if lines.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::styled("No file loaded", Style::default().fg(theme.muted)))
                .centered(),
            inner,
        );
        return;
    }

    let width = lines.len().to_string().len();
    let start = scroll.min(lines.len().saturating_sub(1));
    let visible: Vec<Line<'static>> = lines
        .iter()
        .enumerate()
        .skip(start)
        .take(inner.height as usize)
        .map(|(idx, line)| highlight::with_gutter(idx + 1, width, line, gutter))
        .collect();
    frame.render_widget(Paragraph::new(visible), inner);
}
