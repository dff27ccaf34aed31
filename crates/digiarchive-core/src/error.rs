//! Error types for archive operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by archive operations.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Path does not exist at the time of the operation.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// The filesystem denied access to a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Checksum algorithm outside the supported set.
    #[error("Unsupported checksum algorithm: {name}")]
    UnsupportedAlgorithm { name: String },

    /// Bad field name or otherwise malformed input.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Record is not a member of the collection.
    #[error("Record not found in collection '{collection}'")]
    RecordNotFound { collection: String },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArchiveError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an invalid argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Check if this error means the path was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias used across the archive crates.
pub type Result<T, E = ArchiveError> = std::result::Result<T, E>;

/// Kind of per-file failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// File vanished between listing and use.
    NotFound,
    /// Permission was denied.
    PermissionDenied,
    /// Error reading a file or directory.
    ReadError,
    /// Error writing, moving or deleting.
    WriteError,
}

/// Non-fatal failure collected by bulk operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    /// Path where the failure occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of failure.
    pub kind: FailureKind,
}

impl FileFailure {
    /// Create a new file failure.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: FailureKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Classify an error raised while reading a file.
    pub fn read(path: impl Into<PathBuf>, error: &ArchiveError) -> Self {
        Self::classify(path, error, FailureKind::ReadError)
    }

    /// Classify an error raised while writing, moving or deleting a file.
    pub fn write(path: impl Into<PathBuf>, error: &ArchiveError) -> Self {
        Self::classify(path, error, FailureKind::WriteError)
    }

    fn classify(path: impl Into<PathBuf>, error: &ArchiveError, fallback: FailureKind) -> Self {
        let kind = match error {
            ArchiveError::NotFound { .. } => FailureKind::NotFound,
            ArchiveError::PermissionDenied { .. } => FailureKind::PermissionDenied,
            _ => fallback,
        };
        Self::new(path, error.to_string(), kind)
    }
}

impl std::fmt::Display for FileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}
