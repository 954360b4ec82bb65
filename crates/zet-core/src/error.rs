//! Error handling
//!
//! Provides typed errors for note reading, rewriting and persistence, with
//! descriptive messages and recovery suggestions.
//!
//! Unresolved references between notes are *not* errors; see
//! [`crate::collection::Diagnostic`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Which side of an I/O operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Read,
    Write,
}

/// Errors that can occur while loading, rewriting or writing notes
#[derive(Error, Debug)]
pub enum ZetError {
    /// Failed to read a note file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write a note file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error(
        "Disk full or quota exceeded while writing to '{path}'. Free up disk space and try again."
    )]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File not found (when expected to exist)
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Refused to create a note over an existing file
    #[error("Note already exists: '{path}'")]
    AlreadyExists { path: PathBuf },

    /// Temp file could not be persisted over the target
    #[error("Atomic write failed: could not replace '{path}': {source}")]
    AtomicWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directory walk failed
    #[error("Failed to scan '{path}': {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A link token did not contain exactly one identifier
    #[error("Malformed link '{token}' on line {line} of '{path}'")]
    MalformedLink {
        path: PathBuf,
        line: usize,
        token: String,
    },

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ZetError {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, disk full, etc.)
    pub fn from_io(error: io::Error, path: PathBuf, op: IoOp) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => ZetError::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::NotFound => ZetError::NotFound { path },
            _ if is_disk_full_error(&error) => ZetError::DiskFull {
                path,
                source: error,
            },
            _ => match op {
                IoOp::Read => ZetError::ReadError {
                    path,
                    source: error,
                },
                IoOp::Write => ZetError::WriteError {
                    path,
                    source: error,
                },
            },
        }
    }

    /// Check if this error is recoverable by the user
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ZetError::DiskFull { .. }
                | ZetError::PermissionDenied { .. }
                | ZetError::AlreadyExists { .. }
                | ZetError::MalformedLink { .. }
        )
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            ZetError::DiskFull { .. } => Some("Free up disk space and try again."),
            ZetError::PermissionDenied { .. } => {
                Some("Check file and directory permissions of the notes directory.")
            }
            ZetError::AlreadyExists { .. } => {
                Some("Pick a different title, or wait a second so a new id is generated.")
            }
            ZetError::MalformedLink { .. } => {
                Some("Fix the link so that it wraps a single 14-digit id, e.g. [[20230101120000]].")
            }
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for note operations
pub type Result<T> = std::result::Result<T, ZetError>;
