//! Review session state machine.
//!
//! A [`ReviewSession`] holds at most one [`UploadedFile`] and, once analysed,
//! its [`ReviewOutcome`]. The two asynchronous steps (reading a file and
//! analysing it) hand out tickets stamped with the session generation. Any
//! change of file bumps the generation, so a result arriving for a file the
//! user has already replaced or removed is discarded instead of overwriting
//! the current state.
//!
//! ```text
//!   Empty ──file──▶ FileLoaded ──analyze──▶ Analyzing ──ok──▶ Completed
//!     ▲                ▲  ▲                     │                 │
//!     │                │  └────── failed ───────┘                 │
//!     │                └──────────── new file (any state) ────────┘
//!     └──────────────────────────── remove (any state) ───────────┘
//! ```

use crate::error::{AnalysisError, IntakeError, SessionError};
use crate::types::{ReviewOutcome, UploadedFile};

/// Lifecycle state of the session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No file selected.
    #[default]
    Empty,
    /// A file is loaded and no analysis is running or finished for it.
    FileLoaded,
    /// An analysis request is outstanding.
    Analyzing,
    /// The analysis for the current file finished and its outcome is held.
    Completed,
}

impl SessionState {
    pub fn label(self) -> &'static str {
        match self {
            SessionState::Empty => "EMPTY",
            SessionState::FileLoaded => "READY",
            SessionState::Analyzing => "ANALYZING",
            SessionState::Completed => "COMPLETED",
        }
    }
}

/// Monotonic counter identifying which file the session currently refers to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

/// Issued by [`ReviewSession::begin_intake`]; must accompany the read result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeTicket {
    generation: Generation,
    seq: u64,
}

/// Issued by [`ReviewSession::request_analysis`]; must accompany the analyzer result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    generation: Generation,
}

/// Whether an asynchronous result changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Applied {
    Accepted,
    /// The ticket belonged to a superseded file or request.
    Discarded,
}

/// The single owner of the selected file, analysis lifecycle and outcome.
#[derive(Debug, Default)]
pub struct ReviewSession {
    state: SessionState,
    file: Option<UploadedFile>,
    outcome: Option<ReviewOutcome>,
    generation: Generation,
    intake_seq: u64,
    pending_intake: Option<u64>,
    intake_error: Option<String>,
    analysis_error: Option<AnalysisError>,
}

impl ReviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    pub fn outcome(&self) -> Option<&ReviewOutcome> {
        self.outcome.as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Message from the most recent rejected submission, cleared by the next
    /// accepted one.
    pub fn intake_error(&self) -> Option<&str> {
        self.intake_error.as_deref()
    }

    /// Failure of the last analysis for the current file. Present only in
    /// `FileLoaded`, where it acts as the retry prompt.
    pub fn analysis_error(&self) -> Option<&AnalysisError> {
        self.analysis_error.as_ref()
    }

    /// `true` while a file read started by [`begin_intake`](Self::begin_intake)
    /// has not resolved.
    pub fn intake_pending(&self) -> bool {
        self.pending_intake.is_some()
    }

    /// Starts a file read. Only the most recently issued ticket will be accepted.
    pub fn begin_intake(&mut self) -> IntakeTicket {
        self.intake_seq += 1;
        self.pending_intake = Some(self.intake_seq);
        IntakeTicket {
            generation: self.generation,
            seq: self.intake_seq,
        }
    }

    fn intake_is_current(&self, ticket: IntakeTicket) -> bool {
        ticket.generation == self.generation && self.pending_intake == Some(ticket.seq)
    }

    /// Stores a freshly read file, replacing any previous file and outcome.
    ///
    /// Valid from every state. Discarded if a newer submission was started or
    /// the file was removed after `ticket` was issued.
    pub fn accept_file(&mut self, ticket: IntakeTicket, file: UploadedFile) -> Applied {
        if !self.intake_is_current(ticket) {
            tracing::debug!(file = %file.name, "discarding stale intake result");
            return Applied::Discarded;
        }
        tracing::debug!(from = ?self.state, file = %file.name, "file loaded");
        self.pending_intake = None;
        self.generation = self.generation.next();
        self.file = Some(file);
        self.outcome = None;
        self.intake_error = None;
        self.analysis_error = None;
        self.state = SessionState::FileLoaded;
        Applied::Accepted
    }

    /// Records a failed submission. The current file, if any, is kept.
    pub fn reject_file(&mut self, ticket: IntakeTicket, error: &IntakeError) -> Applied {
        if !self.intake_is_current(ticket) {
            return Applied::Discarded;
        }
        tracing::debug!(%error, "intake rejected");
        self.pending_intake = None;
        self.intake_error = Some(error.to_string());
        Applied::Accepted
    }

    /// Moves `FileLoaded` to `Analyzing` and returns the ticket the analyzer
    /// result must carry.
    ///
    /// # Errors
    ///
    /// `NoFile` in `Empty`, `AlreadyAnalyzing` in `Analyzing`, `AlreadyCompleted`
    /// in `Completed`.
    pub fn request_analysis(&mut self) -> Result<AnalysisTicket, SessionError> {
        match self.state {
            SessionState::Empty => Err(SessionError::NoFile),
            SessionState::Analyzing => Err(SessionError::AlreadyAnalyzing),
            SessionState::Completed => Err(SessionError::AlreadyCompleted),
            SessionState::FileLoaded => {
                tracing::debug!("analysis requested");
                self.outcome = None;
                self.analysis_error = None;
                self.state = SessionState::Analyzing;
                Ok(AnalysisTicket { generation: self.generation })
            }
        }
    }

    /// Applies an analyzer result.
    ///
    /// Success moves `Analyzing` to `Completed`; failure moves it back to
    /// `FileLoaded` and keeps the error for the retry prompt. Results whose
    /// ticket no longer matches the current generation, or that arrive when
    /// the session is not analysing, are discarded.
    pub fn complete_analysis(
        &mut self,
        ticket: AnalysisTicket,
        result: Result<ReviewOutcome, AnalysisError>,
    ) -> Applied {
        if ticket.generation != self.generation || self.state != SessionState::Analyzing {
            tracing::debug!(state = ?self.state, "discarding stale analysis result");
            return Applied::Discarded;
        }
        match result {
            Ok(outcome) => {
                tracing::debug!(
                    score = outcome.overall_score,
                    issues = outcome.issues.len(),
                    "analysis completed"
                );
                self.outcome = Some(outcome);
                self.state = SessionState::Completed;
            }
            Err(error) => {
                tracing::warn!(%error, "analysis failed");
                self.analysis_error = Some(error);
                self.state = SessionState::FileLoaded;
            }
        }
        Applied::Accepted
    }

    /// Clears the file and outcome and returns to `Empty`.
    ///
    /// Any outstanding read or analysis becomes stale.
    ///
    /// # Errors
    ///
    /// `NoFile` when nothing is loaded.
    pub fn remove_file(&mut self) -> Result<(), SessionError> {
        if self.file.is_none() {
            return Err(SessionError::NoFile);
        }
        tracing::debug!(from = ?self.state, "file removed");
        self.generation = self.generation.next();
        self.pending_intake = None;
        self.file = None;
        self.outcome = None;
        self.analysis_error = None;
        self.state = SessionState::Empty;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sample_outcome;

    fn loaded(name: &str) -> ReviewSession {
        let mut s = ReviewSession::new();
        let t = s.begin_intake();
        assert_eq!(s.accept_file(t, UploadedFile::new(name, "x = 1\n")), Applied::Accepted);
        s
    }

    #[test]
    fn starts_empty() {
        let s = ReviewSession::new();
        assert_eq!(s.state(), SessionState::Empty);
        assert!(s.file().is_none());
        assert!(s.outcome().is_none());
        assert!(!s.intake_pending());
    }

    #[test]
    fn analyze_requires_file() {
        let mut s = ReviewSession::new();
        assert_eq!(s.request_analysis(), Err(SessionError::NoFile));
    }

    #[test]
    fn full_happy_path() {
        let mut s = loaded("a.py");
        let t = s.request_analysis().unwrap();
        assert_eq!(s.state(), SessionState::Analyzing);
        assert_eq!(s.request_analysis(), Err(SessionError::AlreadyAnalyzing));
        assert_eq!(s.complete_analysis(t, Ok(sample_outcome())), Applied::Accepted);
        assert_eq!(s.state(), SessionState::Completed);
        assert_eq!(s.request_analysis(), Err(SessionError::AlreadyCompleted));
    }

    #[test]
    fn duplicate_result_is_discarded() {
        let mut s = loaded("a.py");
        let t = s.request_analysis().unwrap();
        assert_eq!(s.complete_analysis(t, Ok(sample_outcome())), Applied::Accepted);
        let again = ReviewOutcome::new(1.0, vec![], vec![]);
        assert_eq!(s.complete_analysis(t, Ok(again)), Applied::Discarded);
        assert_eq!(s.outcome().unwrap().overall_score, 7.5);
    }

    #[test]
    fn failure_returns_to_loaded_with_retry() {
        let mut s = loaded("a.py");
        let t = s.request_analysis().unwrap();
        let err = AnalysisError::Unavailable("timeout".into());
        assert_eq!(s.complete_analysis(t, Err(err.clone())), Applied::Accepted);
        assert_eq!(s.state(), SessionState::FileLoaded);
        assert_eq!(s.analysis_error(), Some(&err));

        let retry = s.request_analysis().unwrap();
        assert!(s.analysis_error().is_none());
        assert_eq!(s.complete_analysis(retry, Ok(sample_outcome())), Applied::Accepted);
        assert_eq!(s.state(), SessionState::Completed);
    }

    #[test]
    fn new_file_while_analyzing_discards_old_result() {
        let mut s = loaded("old.py");
        let stale = s.request_analysis().unwrap();

        let t = s.begin_intake();
        assert_eq!(s.accept_file(t, UploadedFile::new("new.py", "y")), Applied::Accepted);
        assert_eq!(s.state(), SessionState::FileLoaded);

        assert_eq!(s.complete_analysis(stale, Ok(sample_outcome())), Applied::Discarded);
        assert_eq!(s.state(), SessionState::FileLoaded);
        assert!(s.outcome().is_none());
        assert_eq!(s.file().unwrap().name, "new.py");
    }

    #[test]
    fn later_intake_wins_regardless_of_arrival_order() {
        let mut s = ReviewSession::new();
        let first = s.begin_intake();
        let second = s.begin_intake();
        assert_eq!(s.accept_file(second, UploadedFile::new("second.rs", "")), Applied::Accepted);
        assert_eq!(s.accept_file(first, UploadedFile::new("first.rs", "")), Applied::Discarded);
        assert_eq!(s.file().unwrap().name, "second.rs");
    }

    #[test]
    fn earlier_intake_resolving_first_is_still_discarded() {
        let mut s = ReviewSession::new();
        let first = s.begin_intake();
        let second = s.begin_intake();
        assert_eq!(s.accept_file(first, UploadedFile::new("first.rs", "")), Applied::Discarded);
        assert!(s.intake_pending());
        assert_eq!(s.accept_file(second, UploadedFile::new("second.rs", "")), Applied::Accepted);
        assert!(!s.intake_pending());
    }

    #[test]
    fn remove_invalidates_pending_intake() {
        let mut s = loaded("a.py");
        let t = s.begin_intake();
        s.remove_file().unwrap();
        assert_eq!(s.accept_file(t, UploadedFile::new("b.py", "")), Applied::Discarded);
        assert_eq!(s.state(), SessionState::Empty);
        assert!(s.file().is_none());
    }

    #[test]
    fn remove_on_empty_is_error() {
        let mut s = ReviewSession::new();
        assert_eq!(s.remove_file(), Err(SessionError::NoFile));
    }

    #[test]
    fn reject_keeps_current_file() {
        let mut s = loaded("keep.rs");
        let t = s.begin_intake();
        let err = IntakeError::TooLarge { name: "big.rs".into(), size_bytes: 10, max_bytes: 5 };
        assert_eq!(s.reject_file(t, &err), Applied::Accepted);
        assert_eq!(s.file().unwrap().name, "keep.rs");
        assert_eq!(s.state(), SessionState::FileLoaded);
        assert!(s.intake_error().unwrap().contains("big.rs"));
        assert!(!s.intake_pending());

        let t = s.begin_intake();
        let _ = s.accept_file(t, UploadedFile::new("ok.rs", ""));
        assert!(s.intake_error().is_none());
    }
}
