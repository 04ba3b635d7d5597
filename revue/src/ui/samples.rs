//! Samples tab: bundled files that can be loaded with Enter.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Clear, List, ListItem},
};

use crate::app::AppState;
use crate::theme::Theme;
use super::layout::{inner_rect, panel_block};

pub fn render_samples(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    frame.render_widget(Clear, area);
    frame.render_widget(panel_block(" Samples · Enter to load ", true, theme), area);

    let items: Vec<ListItem> = state
        .visible_samples()
        .into_iter()
        .map(|sample| {
            ListItem::new(Text::from(vec![
                Line::from(Span::styled(
                    sample.name,
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                )),
                Line::styled(format!("  {}", sample.description), Style::default().fg(theme.muted)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().fg(theme.primary))
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(list, inner_rect(area), &mut state.samples_state);
}
