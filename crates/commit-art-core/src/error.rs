//! Error taxonomy for commit-art.

use std::path::PathBuf;

/// Why a single input line was rejected. Recoverable: the line is skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineFormatError {
    #[error("expected 2 comma-separated fields, found {found}")]
    WrongFieldCount { found: usize },

    #[error("field {field:?} is not an integer")]
    NotAnInteger { field: String },

    #[error("coordinate ({column},{row}) is out of bounds for a {width}x7 grid")]
    OutOfRange { column: i64, row: i64, width: u32 },
}

/// Failures reported by a [`RepositoryLifecycle`](crate::RepositoryLifecycle).
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("{} already exists", .0.display())]
    DirectoryExists(PathBuf),

    #[error("unable to initialize repository at {}: {reason}", .path.display())]
    DirectoryInit { path: PathBuf, reason: String },

    #[error("{step} failed: {reason}")]
    Command { step: String, reason: String },
}

impl LifecycleError {
    /// Directory errors abort the run before any commit is attempted.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LifecycleError::DirectoryExists(_) | LifecycleError::DirectoryInit { .. }
        )
    }
}

/// Crate-wide errors.
#[derive(Debug, thiserror::Error)]
pub enum ArtError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("aborted at {step}: {reason}")]
    Aborted { step: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for commit-art operations.
pub type Result<T> = std::result::Result<T, ArtError>;
