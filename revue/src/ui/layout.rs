//! Responsive layout engine for revue.
//!
//! Pure layout arithmetic plus the chrome shared by every tab (tab bar,
//! panel borders, status bar). No mutable application state lives here.
//!
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes adjacent panel borders share a single column and merge their
//! junction characters.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Tabs},
};

use crate::app::{AppState, Mode, Tab};
use crate::theme::Theme;

/// Width at which the Review tab puts the results beside the code instead of below it.
pub const WIDE_LAYOUT_MIN_WIDTH: u16 = 110;

/// Height of the upload panel, borders included.
const UPLOAD_HEIGHT: u16 = 7;

/// Splits the frame into `[tab_bar, body, status_bar]`.
pub fn compute_chrome(area: Rect) -> [Rect; 3] {
    area.layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]))
}

/// Splits the Review tab body into `[upload, preview, results]`.
///
/// | Body width | Layout |
/// |------------|--------|
/// | `>= 110`   | upload over preview on the left (55%), results on the right |
/// | `< 110`    | upload, preview and results stacked |
pub fn compute_review_layout(body: Rect) -> [Rect; 3] {
    if body.width >= WIDE_LAYOUT_MIN_WIDTH {
        let [left, results] = body.layout(
            &Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .spacing(Spacing::Overlap(1)),
        );
        let [upload, preview] = left.layout(
            &Layout::vertical([Constraint::Length(UPLOAD_HEIGHT), Constraint::Fill(1)])
                .spacing(Spacing::Overlap(1)),
        );
        [upload, preview, results]
    } else {
        let [upload, preview, results] = body.layout(
            &Layout::vertical([
                Constraint::Length(UPLOAD_HEIGHT),
                Constraint::Fill(1),
                Constraint::Fill(1),
            ])
            .spacing(Spacing::Overlap(1)),
        );
        [upload, preview, results]
    }
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border on each side.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// `BorderType::Thick` marks the focused panel. `MergeStrategy::Fuzzy` is
/// required because `Exact` produces wrong junctions when mixing `Thick` and
/// `Plain` borders.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the tab bar: app name, the three tabs, and the active analyzer.
pub fn render_tab_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let [name, tabs, analyzer] = area.layout(&Layout::horizontal([
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(state.analyzer_name.len() as u16 + 12),
    ]));

    frame.render_widget(
        Paragraph::new(Span::styled(
            " revue ",
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        name,
    );

    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{} {}", i + 1, t.title()));
    frame.render_widget(
        Tabs::new(titles)
            .select(state.tab.index())
            .style(Style::default().fg(theme.muted))
            .highlight_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
        tabs,
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("analyzer: ", Style::default().fg(theme.muted)),
            Span::styled(state.analyzer_name.clone(), Style::default().fg(theme.text)),
        ]))
        .right_aligned(),
        analyzer,
    );
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// Always shows a mode indicator and the session state; a transient message
/// follows when one is set.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::PathInput => (" PATH ", theme.status_mode_insert),
        Mode::Normal | Mode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
    };

    let mut spans = vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(
            state.session.state().label(),
            Style::default().fg(theme.status_bar_fg).add_modifier(Modifier::BOLD),
        ),
    ];
    match &state.status {
        Some(msg) => {
            let fg = if msg.is_error { theme.critical } else { theme.status_bar_fg };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(msg.text.clone(), Style::default().fg(fg)));
        }
        None => {
            spans.push(Span::styled("  ? help  q quit", Style::default().fg(theme.muted)));
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_body_puts_results_on_the_right() {
        let [upload, preview, results] = compute_review_layout(Rect::new(0, 0, 160, 40));
        assert_eq!(upload.x, preview.x);
        assert!(results.x > preview.x);
        assert_eq!(results.height, 40);
    }

    #[test]
    fn narrow_body_stacks_panels() {
        let [upload, preview, results] = compute_review_layout(Rect::new(0, 0, 80, 40));
        assert_eq!(upload.height, UPLOAD_HEIGHT);
        assert!(preview.y > upload.y);
        assert!(results.y > preview.y);
        assert_eq!(results.x, 0);
    }

    #[test]
    fn chrome_reserves_one_row_each() {
        let [tabs, body, status] = compute_chrome(Rect::new(0, 0, 100, 30));
        assert_eq!(tabs.height, 1);
        assert_eq!(status.height, 1);
        assert_eq!(body.height, 28);
    }
}
