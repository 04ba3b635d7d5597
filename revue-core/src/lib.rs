//! revue-core — file intake, review session state machine and results presenter.
//!
//! This crate has no terminal dependencies. The `revue` binary owns a single
//! [`session::ReviewSession`], spawns intake reads and analyzer calls as tokio
//! tasks, and feeds their results back through the session's ticket checks.
//! [`presenter::render`] turns the session into a plain view model that the
//! binary draws with ratatui.

pub mod analysis;
pub mod error;
pub mod history;
pub mod intake;
pub mod presenter;
pub mod samples;
pub mod session;
pub mod types;

pub use analysis::{sample_outcome, AnalysisRequest, Analyzer, MockAnalyzer};
pub use error::{AnalysisError, IntakeError, SessionError};
pub use intake::{FileIntake, IntakePolicy};
pub use session::{Applied, ReviewSession, SessionState};
pub use types::{IssueKind, ReviewIssue, ReviewOutcome, Severity, UploadedFile};
