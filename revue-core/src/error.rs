//! Error types for intake, analysis and session transitions.
//!
//! None of these are fatal. Intake errors are shown in the upload panel and the
//! user retries the selection; analysis errors put the session back into
//! `FileLoaded` with a retry prompt; session errors are rejected keypresses.

use thiserror::Error;

/// Failure to turn a user-provided file into an [`UploadedFile`](crate::types::UploadedFile).
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The file could not be opened or read, or its bytes are not valid UTF-8.
    #[error("could not read '{name}': {source}")]
    ReadFailure {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The file exceeds the configured intake limit.
    #[error("'{name}' is {size_bytes} bytes, limit is {max_bytes} bytes")]
    TooLarge {
        name: String,
        size_bytes: u64,
        max_bytes: u64,
    },

    /// The path points at a directory or other non-regular file.
    #[error("'{name}' is not a regular file")]
    NotAFile { name: String },
}

impl IntakeError {
    /// Display name of the file the error refers to.
    pub fn file_name(&self) -> &str {
        match self {
            IntakeError::ReadFailure { name, .. }
            | IntakeError::TooLarge { name, .. }
            | IntakeError::NotAFile { name } => name,
        }
    }
}

/// Failure reported by an [`Analyzer`](crate::analysis::Analyzer).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// The analysis service could not be reached or timed out.
    #[error("analysis service unavailable: {0}")]
    Unavailable(String),

    /// The service answered but refused the input.
    #[error("analysis rejected: {0}")]
    Rejected(String),
}

/// A session operation that is not valid in the current state.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no file loaded")]
    NoFile,

    #[error("analysis already in progress")]
    AlreadyAnalyzing,

    #[error("analysis already completed for this file")]
    AlreadyCompleted,
}
