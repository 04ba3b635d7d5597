//! Results presenter: a pure mapping from session state to a view model.
//!
//! [`render`] holds no state and performs no I/O. The binary draws whatever
//! [`ResultsView`] it returns, so every visible change in the results panel is
//! a consequence of a session transition.

use crate::session::{ReviewSession, SessionState};
use crate::types::{IssueKind, ReviewIssue, ReviewOutcome, Severity};

/// Color band of the overall score badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Success,
    Warning,
    Critical,
}

impl ScoreBand {
    /// `>= 8` success, `>= 6` warning, otherwise critical. Boundaries belong
    /// to the higher band.
    pub fn for_score(score: f32) -> Self {
        if score >= 8.0 {
            ScoreBand::Success
        } else if score >= 6.0 {
            ScoreBand::Warning
        } else {
            ScoreBand::Critical
        }
    }
}

/// Color band of a severity badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityBand {
    Destructive,
    Warning,
    Secondary,
}

impl From<Severity> for SeverityBand {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Critical | Severity::High => SeverityBand::Destructive,
            Severity::Medium => SeverityBand::Warning,
            Severity::Low => SeverityBand::Secondary,
        }
    }
}

/// Which prompt to show when there is nothing to report yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallToAction {
    /// No file: ask for one.
    UploadPrompt,
    /// File loaded, analysis not yet requested.
    ReadyToAnalyze { file_name: String },
    /// The previous analysis failed; offer to run it again.
    Retry { file_name: String, reason: String },
}

/// One issue row, in the order the analyzer produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueView {
    pub kind: IssueKind,
    pub title: String,
    pub description: String,
    /// `"Line N"` when the analyzer gave a line.
    pub line_label: Option<String>,
    pub severity_label: &'static str,
    pub severity_band: SeverityBand,
    pub suggestion: Option<String>,
}

impl From<&ReviewIssue> for IssueView {
    fn from(issue: &ReviewIssue) -> Self {
        Self {
            kind: issue.kind,
            title: issue.title.clone(),
            description: issue.description.clone(),
            line_label: issue.line.map(|n| format!("Line {n}")),
            severity_label: issue.severity.badge(),
            severity_band: issue.severity.into(),
            suggestion: issue.suggestion.clone(),
        }
    }
}

/// Completed-analysis report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub file_name: String,
    pub score: f32,
    /// e.g. `"7.5/10"`.
    pub score_label: String,
    pub score_band: ScoreBand,
    /// `score * 10`, for the progress gauge.
    pub progress_percent: u16,
    pub strengths: Vec<String>,
    pub issues: Vec<IssueView>,
    /// Set when `issues` is empty so the panel shows an explicit all-clear.
    pub no_issues: bool,
}

impl ReportView {
    fn new(file_name: &str, outcome: &ReviewOutcome) -> Self {
        let score = outcome.overall_score;
        Self {
            file_name: file_name.to_owned(),
            score,
            score_label: format!("{score}/10"),
            score_band: ScoreBand::for_score(score),
            progress_percent: (score * 10.0).round().clamp(0.0, 100.0) as u16,
            strengths: outcome.strengths.clone(),
            issues: outcome.issues.iter().map(IssueView::from).collect(),
            no_issues: outcome.issues.is_empty(),
        }
    }

    /// Heading for the issue list, e.g. `"Issues Found (3)"`.
    pub fn issues_heading(&self) -> String {
        format!("Issues Found ({})", self.issues.len())
    }
}

/// Everything the results panel can show.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    CallToAction(CallToAction),
    /// Skeleton while the analyzer runs. Deliberately carries no score or issues.
    Loading { file_name: String },
    Report(ReportView),
}

/// Maps the session to the results panel view.
pub fn render(session: &ReviewSession) -> ResultsView {
    let file_name = session.file().map(|f| f.name.clone()).unwrap_or_default();
    match (session.state(), session.outcome()) {
        (SessionState::Empty, _) => ResultsView::CallToAction(CallToAction::UploadPrompt),
        (SessionState::FileLoaded, _) => match session.analysis_error() {
            Some(err) => ResultsView::CallToAction(CallToAction::Retry {
                file_name,
                reason: err.to_string(),
            }),
            None => ResultsView::CallToAction(CallToAction::ReadyToAnalyze { file_name }),
        },
        (SessionState::Analyzing, _) => ResultsView::Loading { file_name },
        (SessionState::Completed, Some(outcome)) => {
            ResultsView::Report(ReportView::new(&file_name, outcome))
        }
        // The session never reaches Completed without an outcome.
        (SessionState::Completed, None) => {
            ResultsView::CallToAction(CallToAction::ReadyToAnalyze { file_name })
        }
    }
}
