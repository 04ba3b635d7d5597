use std::num::NonZeroU32;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A source file accepted by intake and held by the review session.
///
/// Created on a successful read, replaced wholesale when another file is
/// submitted, and dropped when the user removes it. `size_bytes` is always the
/// byte length of `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub size_bytes: u64,
    pub content: String,
}

impl UploadedFile {
    /// Builds an `UploadedFile` from already-decoded text.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size_bytes: content.len() as u64,
            content,
        }
    }

    /// Number of `\n`-separated lines. A trailing newline counts as an extra
    /// empty line, matching how the preview numbers rows.
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    /// Lower-cased extension without the dot, if the name has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }

    /// Preview language derived from the extension; `"text"` when unknown.
    pub fn language(&self) -> &'static str {
        language_for_extension(self.extension().as_deref().unwrap_or(""))
    }

    /// Size in kilobytes with one decimal, e.g. `"3.4 KB"`.
    pub fn size_label(&self) -> String {
        format!("{:.1} KB", self.size_bytes as f64 / 1024.0)
    }
}

/// Maps a lower-case extension to the language name shown in the preview badge.
pub fn language_for_extension(ext: &str) -> &'static str {
    match ext {
        "js" => "javascript",
        "jsx" => "jsx",
        "ts" => "typescript",
        "tsx" => "tsx",
        "py" => "python",
        "cpp" => "cpp",
        "c" => "c",
        "java" => "java",
        "cs" => "csharp",
        "rb" => "ruby",
        "go" => "go",
        "rs" => "rust",
        _ => "text",
    }
}

/// Category of a review finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Bug,
    Vulnerability,
    Improvement,
    Style,
}

impl IssueKind {
    pub fn label(self) -> &'static str {
        match self {
            IssueKind::Bug => "bug",
            IssueKind::Vulnerability => "vulnerability",
            IssueKind::Improvement => "improvement",
            IssueKind::Style => "style",
        }
    }
}

/// How serious a finding is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Upper-case badge text, e.g. `"HIGH"`.
    pub fn badge(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

/// A single flagged finding with an optional remediation suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<NonZeroU32>, // 1-based
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// The structured result of one analysis: score, findings, strengths.
///
/// Issues and strengths keep the order the analyzer produced; nothing sorts
/// or de-duplicates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub overall_score: f32, // 0.0 ..= 10.0
    pub issues: Vec<ReviewIssue>,
    pub strengths: Vec<String>,
}

impl ReviewOutcome {
    pub const MAX_SCORE: f32 = 10.0;

    /// Builds an outcome, clamping the score into `0.0..=10.0`.
    ///
    /// A NaN score is treated as 0.
    pub fn new(overall_score: f32, issues: Vec<ReviewIssue>, strengths: Vec<String>) -> Self {
        let overall_score = if overall_score.is_nan() {
            0.0
        } else {
            overall_score.clamp(0.0, Self::MAX_SCORE)
        };
        Self { overall_score, issues, strengths }
    }
}
