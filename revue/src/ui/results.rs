//! Results panel. Draws whatever [`presenter::render`] returns for the session.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Clear, Paragraph, Wrap},
};

use revue_core::presenter::{self, CallToAction, IssueView, ReportView, ResultsView};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use super::layout::{inner_rect, panel_block};

/// Width of the text progress bar under the score.
const GAUGE_WIDTH: usize = 20;

pub fn render_results(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let focused = state.focus == PanelFocus::Results;
    frame.render_widget(Clear, area);

    let view = presenter::render(&state.session);
    let text = results_text(&view, theme);
    // Clamp the stored offset so scrolling back up responds immediately.
    let max_scroll = u16::try_from(text.lines.len().saturating_sub(1)).unwrap_or(u16::MAX);
    state.results_scroll = state.results_scroll.min(max_scroll);

    let inner = inner_rect(area);
    frame.render_widget(panel_block(" Review ", focused, theme), area);
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: false }).scroll((state.results_scroll, 0)),
        inner,
    );
}

pub(crate) fn results_text(view: &ResultsView, theme: &Theme) -> Text<'static> {
    match view {
        ResultsView::CallToAction(cta) => call_to_action(cta, theme),
        ResultsView::Loading { file_name } => loading(file_name, theme),
        ResultsView::Report(report) => report_text(report, theme),
    }
}

fn call_to_action(cta: &CallToAction, theme: &Theme) -> Text<'static> {
    let heading = Style::default().fg(theme.primary).add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(theme.muted);
    let lines = match cta {
        CallToAction::UploadPrompt => vec![
            Line::styled("Upload a file to get a review", heading),
            Line::styled("Load a file on the left, or pick one from the Samples tab (3).", muted),
        ],
        CallToAction::ReadyToAnalyze { file_name } => vec![
            Line::styled(format!("Ready to review {file_name}"), heading),
            Line::styled("Press a to start the analysis.", muted),
        ],
        CallToAction::Retry { file_name, reason } => vec![
            Line::styled(
                format!("Analysis of {file_name} failed"),
                Style::default().fg(theme.critical).add_modifier(Modifier::BOLD),
            ),
            Line::styled(reason.clone(), Style::default().fg(theme.text)),
            Line::styled("Press a to retry.", muted),
        ],
    };
    Text::from(lines)
}

fn loading(file_name: &str, theme: &Theme) -> Text<'static> {
    let skeleton = Style::default().fg(theme.skeleton);
    let mut lines = vec![
        Line::styled(
            format!("Analyzing {file_name}…"),
            Style::default().fg(theme.primary).add_modifier(Modifier::ITALIC),
        ),
        Line::raw(""),
    ];
    for width in [28, 18, 0, 32, 24, 30, 0, 26, 20] {
        lines.push(Line::styled("▆".repeat(width), skeleton));
    }
    Text::from(lines)
}

fn gauge(percent: u16) -> String {
    let filled = (usize::from(percent.min(100)) * GAUGE_WIDTH).div_ceil(100);
    format!("{}{}", "█".repeat(filled), "░".repeat(GAUGE_WIDTH - filled))
}

fn report_text(report: &ReportView, theme: &Theme) -> Text<'static> {
    let band = Style::default().fg(theme.score_color(report.score_band));
    let heading = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Overall Score  ", heading),
            Span::styled(report.score_label.clone(), band.add_modifier(Modifier::BOLD)),
        ]),
        Line::styled(gauge(report.progress_percent), band),
        Line::raw(""),
    ];

    if !report.strengths.is_empty() {
        lines.push(Line::styled("Strengths", heading));
        for strength in &report.strengths {
            lines.push(Line::from(vec![
                Span::styled("  ✓ ", Style::default().fg(theme.success)),
                Span::styled(strength.clone(), Style::default().fg(theme.text)),
            ]));
        }
        lines.push(Line::raw(""));
    }

    lines.push(Line::styled(report.issues_heading(), heading));
    if report.no_issues {
        lines.push(Line::styled(
            "  No issues found. Nice work!",
            Style::default().fg(theme.success),
        ));
    }
    for issue in &report.issues {
        issue_lines(issue, theme, &mut lines);
    }
    Text::from(lines)
}

fn issue_lines(issue: &IssueView, theme: &Theme, out: &mut Vec<Line<'static>>) {
    let badge = Style::default()
        .fg(theme.severity_color(issue.severity_band))
        .add_modifier(Modifier::BOLD | Modifier::REVERSED);
    let mut header = vec![
        Span::styled(format!(" {} ", issue.severity_label), badge),
        Span::raw(" "),
        Span::styled(issue.kind.label(), Style::default().fg(theme.muted)),
    ];
    if let Some(line) = &issue.line_label {
        header.push(Span::styled(format!(" · {line}"), Style::default().fg(theme.muted)));
    }
    out.push(Line::raw(""));
    out.push(Line::from(header));
    out.push(Line::styled(
        issue.title.clone(),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    ));
    out.push(Line::styled(issue.description.clone(), Style::default().fg(theme.muted)));
    if let Some(fix) = &issue.suggestion {
        out.push(Line::from(vec![
            Span::styled("Suggested Fix: ", Style::default().fg(theme.primary)),
            Span::styled(fix.clone(), Style::default().fg(theme.text)),
        ]));
    }
}
