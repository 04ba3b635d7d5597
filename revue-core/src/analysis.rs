//! Analyzer strategy and the bundled mock.
//!
//! The dashboard never knows what produces a [`ReviewOutcome`]. It hands an
//! [`AnalysisRequest`] to whatever [`Analyzer`] it was built with and feeds
//! the result back into the session. [`MockAnalyzer`] waits for a fixed delay
//! and returns [`sample_outcome`].

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::types::{IssueKind, ReviewIssue, ReviewOutcome, Severity, UploadedFile};

/// Input passed to an analyzer. Owned so it can move into a spawned task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub file_name: String,
    pub content: String,
}

impl From<&UploadedFile> for AnalysisRequest {
    fn from(file: &UploadedFile) -> Self {
        Self {
            file_name: file.name.clone(),
            content: file.content.clone(),
        }
    }
}

/// A code-review backend.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Reviews one file.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<ReviewOutcome, AnalysisError>;

    /// Short name shown in the status bar.
    fn name(&self) -> &str;
}

/// Default simulated latency of [`MockAnalyzer`].
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(3000);

/// Returns [`sample_outcome`] after `delay`, regardless of input.
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    delay: Duration,
}

impl MockAnalyzer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_MOCK_DELAY)
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<ReviewOutcome, AnalysisError> {
        tracing::debug!(
            file = %request.file_name,
            delay_ms = self.delay.as_millis() as u64,
            "mock analysis started"
        );
        tokio::time::sleep(self.delay).await;
        Ok(sample_outcome())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn line(n: u32) -> Option<NonZeroU32> {
    NonZeroU32::new(n)
}

/// The fixed review the mock analyzer returns: score 7.5, three issues, four strengths.
pub fn sample_outcome() -> ReviewOutcome {
    ReviewOutcome::new(
        7.5,
        vec![
            ReviewIssue {
                kind: IssueKind::Improvement,
                severity: Severity::Medium,
                line: line(15),
                title: "Consider using const instead of let".into(),
                description: "Variable is never reassigned, const would be more appropriate".into(),
                suggestion: Some("Replace let with const for better code immutability".into()),
            },
            ReviewIssue {
                kind: IssueKind::Style,
                severity: Severity::Low,
                line: line(23),
                title: "Inconsistent indentation".into(),
                description: "Mixed spaces and tabs detected".into(),
                suggestion: Some(
                    "Use consistent indentation (2 or 4 spaces) throughout the file".into(),
                ),
            },
            ReviewIssue {
                kind: IssueKind::Bug,
                severity: Severity::High,
                line: line(42),
                title: "Potential null reference error".into(),
                description: "Object property accessed without null check".into(),
                suggestion: Some("Add null check or use optional chaining (?.) operator".into()),
            },
        ],
        vec![
            "Good function naming conventions".into(),
            "Proper error handling implemented".into(),
            "Clear code structure and organization".into(),
            "Effective use of TypeScript types".into(),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_matches_fixture() {
        let outcome = sample_outcome();
        assert_eq!(outcome.overall_score, 7.5);
        assert_eq!(outcome.issues.len(), 3);
        assert_eq!(outcome.strengths.len(), 4);
        let kinds: Vec<_> = outcome.issues.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, [IssueKind::Improvement, IssueKind::Style, IssueKind::Bug]);
        assert_eq!(outcome.issues[2].line.map(NonZeroU32::get), Some(42));
    }

    #[tokio::test(start_paused = true)]
    async fn mock_waits_for_delay() {
        let analyzer = MockAnalyzer::new(Duration::from_secs(3));
        let request = AnalysisRequest::from(&UploadedFile::new("utils.py", "print(1)\n"));
        let start = tokio::time::Instant::now();
        let outcome = analyzer.analyze(&request).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert_eq!(outcome, sample_outcome());
        assert_eq!(analyzer.name(), "mock");
    }
}
