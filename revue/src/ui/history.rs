//! History tab: reviews completed during this run, newest first.

use std::time::{Duration, SystemTime};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, Paragraph},
};

use revue_core::history::HistoryEntry;
use revue_core::presenter::ScoreBand;

use crate::app::AppState;
use crate::theme::Theme;
use super::layout::{inner_rect, panel_block};

pub fn render_history(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    frame.render_widget(Clear, area);
    let title = format!(" History ({}) ", state.history.len());
    frame.render_widget(panel_block(title, true, theme), area);
    let inner = inner_rect(area);

    if state.history.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::styled(
                "No reviews yet. Completed reviews from this session appear here.",
                Style::default().fg(theme.muted),
            )),
            inner,
        );
        return;
    }

    let now = SystemTime::now();
    let items: Vec<ListItem> = state
        .history
        .entries()
        .iter()
        .map(|entry| ListItem::new(entry_line(entry, now, theme)))
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(list, inner, &mut state.history_state);
}

fn entry_line(entry: &HistoryEntry, now: SystemTime, theme: &Theme) -> Line<'static> {
    let band = theme.score_color(ScoreBand::for_score(entry.score));
    let age = now.duration_since(entry.completed_at).unwrap_or_default();
    let issues = match entry.issue_count {
        1 => "1 issue".to_owned(),
        n => format!("{n} issues"),
    };
    Line::from(vec![
        Span::styled(format!("{:>8}  ", ago(age)), Style::default().fg(theme.muted)),
        Span::styled(format!("{:<32}", entry.file_name), Style::default().fg(theme.text)),
        Span::styled(
            format!("{:>6}/10  ", entry.score),
            Style::default().fg(band).add_modifier(Modifier::BOLD),
        ),
        Span::styled(issues, Style::default().fg(theme.muted)),
    ])
}

/// Coarse relative time: `"12s ago"`, `"3m ago"`, `"2h ago"`.
fn ago(age: Duration) -> String {
    let secs = age.as_secs();
    match secs {
        0..=59 => format!("{secs}s ago"),
        60..=3599 => format!("{}m ago", secs / 60),
        _ => format!("{}h ago", secs / 3600),
    }
}
