//! File intake: size check, UTF-8 read, and dropped-path normalisation.
//!
//! [`FileIntake::submit`] is the only suspend point on the intake side. It
//! checks metadata before reading so an oversized file is rejected without
//! loading it. The extension allow-list is advisory and never rejects.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::IntakeError;
use crate::types::UploadedFile;

/// 5 MiB.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Extensions offered by the picker and listed in the upload panel.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".js", ".jsx", ".ts", ".tsx", ".py", ".cpp", ".java", ".c", ".cs", ".rb", ".go", ".rs",
];

/// Limits applied to every submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakePolicy {
    pub max_size_bytes: u64,
    /// Dotted, lower-case extensions, e.g. `".rs"`.
    pub accepted_extensions: Vec<String>,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            accepted_extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_owned()).collect(),
        }
    }
}

impl IntakePolicy {
    /// Returns `true` when `name` ends with one of the accepted extensions
    /// (case-insensitive).
    pub fn is_accepted(&self, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        self.accepted_extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()))
    }

    /// Max size in megabytes with one decimal, as shown in the upload panel.
    pub fn max_size_label(&self) -> String {
        format!("{:.1}MB", self.max_size_bytes as f64 / 1024.0 / 1024.0)
    }

    /// Comma-separated extension list for the upload panel.
    pub fn extensions_label(&self) -> String {
        self.accepted_extensions.join(", ")
    }
}

/// Reads user-selected files into [`UploadedFile`]s under an [`IntakePolicy`].
#[derive(Debug, Clone, Default)]
pub struct FileIntake {
    policy: IntakePolicy,
}

impl FileIntake {
    pub fn new(policy: IntakePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    /// Validates and reads the file at `path`.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::NotAFile`] when `path` is a directory or special file.
    /// - [`IntakeError::TooLarge`] when the on-disk size exceeds the limit.
    /// - [`IntakeError::ReadFailure`] when the file cannot be read or is not UTF-8.
    pub async fn submit(&self, path: &Path) -> Result<UploadedFile, IntakeError> {
        let name = display_name(path);
        let read_failure = |source: io::Error| IntakeError::ReadFailure {
            name: name.clone(),
            source,
        };

        let meta = tokio::fs::metadata(path).await.map_err(read_failure)?;
        if !meta.is_file() {
            return Err(IntakeError::NotAFile { name });
        }
        self.check_size(&name, meta.len())?;

        let bytes = tokio::fs::read(path).await.map_err(read_failure)?;
        let file = self.from_bytes(name, bytes)?;
        if !self.policy.is_accepted(&file.name) {
            tracing::info!(
                file = %file.name,
                "extension not in the supported list, previewing as-is"
            );
        }
        tracing::debug!(file = %file.name, size = file.size_bytes, "intake read complete");
        Ok(file)
    }

    /// Builds an `UploadedFile` from an in-memory buffer under the same size
    /// and UTF-8 rules as [`submit`](Self::submit).
    ///
    /// # Errors
    ///
    /// [`IntakeError::TooLarge`] or [`IntakeError::ReadFailure`].
    pub fn from_bytes(
        &self,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile, IntakeError> {
        let name = name.into();
        // The metadata check can race with a concurrent writer; re-check the bytes we got.
        self.check_size(&name, bytes.len() as u64)?;
        let content = String::from_utf8(bytes).map_err(|e| IntakeError::ReadFailure {
            name: name.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        Ok(UploadedFile::new(name, content))
    }

    fn check_size(&self, name: &str, size_bytes: u64) -> Result<(), IntakeError> {
        if size_bytes > self.policy.max_size_bytes {
            return Err(IntakeError::TooLarge {
                name: name.to_owned(),
                size_bytes,
                max_bytes: self.policy.max_size_bytes,
            });
        }
        Ok(())
    }
}

/// File name component of `path`, or the whole path when it has none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Turns text pasted into the terminal (usually a file dropped onto it) into a path.
///
/// Trims whitespace, strips one layer of matching quotes, removes a `file://`
/// prefix, unescapes `\ ` and expands a leading `~/` using `home`. Returns
/// `None` for blank input.
pub fn normalize_dropped_path(raw: &str, home: Option<&Path>) -> Option<PathBuf> {
    let mut s = raw.trim();
    for quote in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            s = &s[1..s.len() - 1];
            break;
        }
    }
    let s = s.strip_prefix("file://").unwrap_or(s);
    if s.is_empty() {
        return None;
    }
    let unescaped = s.replace("\\ ", " ");
    match (unescaped.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => Some(home.join(rest)),
        _ => Some(PathBuf::from(unescaped)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_extensions_are_case_insensitive() {
        let policy = IntakePolicy::default();
        assert!(policy.is_accepted("main.rs"));
        assert!(policy.is_accepted("Component.TSX"));
        assert!(!policy.is_accepted("README.md"));
        assert!(!policy.is_accepted("rs"));
    }

    #[test]
    fn labels() {
        let policy = IntakePolicy::default();
        assert_eq!(policy.max_size_label(), "5.0MB");
        assert!(policy.extensions_label().starts_with(".js, .jsx"));
    }

    #[test]
    fn from_bytes_rejects_invalid_utf8() {
        let intake = FileIntake::default();
        let err = intake.from_bytes("bin.c", vec![0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, IntakeError::ReadFailure { .. }));
        assert_eq!(err.file_name(), "bin.c");
    }

    #[test]
    fn from_bytes_enforces_limit() {
        let intake = FileIntake::new(IntakePolicy { max_size_bytes: 4, ..IntakePolicy::default() });
        assert!(intake.from_bytes("a.py", b"1234".to_vec()).is_ok());
        let err = intake.from_bytes("a.py", b"12345".to_vec()).unwrap_err();
        assert!(matches!(err, IntakeError::TooLarge { size_bytes: 5, max_bytes: 4, .. }));
    }

    #[test]
    fn dropped_paths() {
        let home = Path::new("/home/dev");
        assert_eq!(
            normalize_dropped_path("  '/tmp/my file.rs'\n", Some(home)),
            Some(PathBuf::from("/tmp/my file.rs"))
        );
        assert_eq!(
            normalize_dropped_path("file:///tmp/a.py", Some(home)),
            Some(PathBuf::from("/tmp/a.py"))
        );
        assert_eq!(
            normalize_dropped_path("/tmp/my\\ file.rs", None),
            Some(PathBuf::from("/tmp/my file.rs"))
        );
        assert_eq!(
            normalize_dropped_path("~/src/lib.rs", Some(home)),
            Some(PathBuf::from("/home/dev/src/lib.rs"))
        );
        assert_eq!(normalize_dropped_path("   ", Some(home)), None);
        assert_eq!(normalize_dropped_path("''", Some(home)), None);
    }
}
