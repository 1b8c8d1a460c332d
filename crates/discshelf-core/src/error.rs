//! Error types for scanning and transfer operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while scanning a file for a game identifier.
///
/// A scan that reads the whole file without finding a token is not an
/// error; see [`crate::ScanOutcome::Unidentified`].
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Path exists but is not a regular file.
    #[error("Not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Whether opening or reading the file failed, as opposed to the
    /// scanner being misconfigured.
    pub fn is_unreadable(&self) -> bool {
        !matches!(self, Self::InvalidConfig { .. })
    }
}

/// Errors that end a transfer without moving the file.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The source path has no file name to carry over to a directory target.
    #[error("Source has no file name: {path}")]
    InvalidSource { path: PathBuf },

    /// The source could not be inspected or opened.
    #[error("Cannot read source {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination's parent directory could not be created.
    #[error("Failed to create destination directory {path}: {source}")]
    DestinationSetup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rename failed for a reason other than crossing devices.
    #[error("Rename to {destination} failed: {source}")]
    Rename {
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fallback copy failed. The source is untouched and any partial
    /// destination file is left in place.
    #[error("Copy to {destination} failed after {copied_bytes} bytes: {source}")]
    Copy {
        destination: PathBuf,
        copied_bytes: u64,
        #[source]
        source: std::io::Error,
    },

    /// The copy completed but the source could not be removed afterwards.
    #[error("Copied to {destination} but failed to remove source {path}: {source}")]
    RemoveSource {
        path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The worker running the transfer died before reporting an outcome.
    #[error("Transfer task failed: {message}")]
    Task { message: String },
}

impl TransferError {
    /// Whether the failure happened after the copy fallback started.
    pub fn is_copy_failure(&self) -> bool {
        matches!(self, Self::Copy { .. } | Self::RemoveSource { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_io() {
        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::PermissionDenied { .. }));

        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ScanError::NotFound { .. }));
        assert!(err.is_unreadable());

        let err = ScanError::io("/test/path", std::io::Error::other("boom"));
        assert!(matches!(err, ScanError::Io { .. }));
        assert!(err.is_unreadable());

        let err = ScanError::InvalidConfig {
            message: "bad overlap".to_string(),
        };
        assert!(!err.is_unreadable());
    }

    #[test]
    fn test_transfer_error_classification() {
        let err = TransferError::Copy {
            destination: PathBuf::from("/dst/game.iso"),
            copied_bytes: 42,
            source: std::io::Error::other("disk full"),
        };
        assert!(err.is_copy_failure());
        assert!(err.to_string().contains("42 bytes"));

        let err = TransferError::Rename {
            destination: PathBuf::from("/dst/game.iso"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_copy_failure());
    }
}
