//! Error taxonomy for snapshot ingestion and report generation
//!
//! Per-source failures (`SourceUnreadable`) are recoverable inside the
//! timeline builder; set-level emptiness (`EmptyInputSet`) always aborts.
//! Records that are not mappings are not errors at all, see
//! [`crate::normalize::RecordShape::Malformed`].

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while discovering, loading, or rendering snapshots
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot source unreadable: {}: {reason}", .path.display())]
    SourceUnreadable { path: PathBuf, reason: String },

    #[error("No snapshot sources found in {location}")]
    EmptyInputSet { location: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SnapshotError {
    /// Build a `SourceUnreadable` error for `path`
    pub fn unreadable(path: &Path, reason: impl ToString) -> Self {
        SnapshotError::SourceUnreadable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// True when the error concerns a single source rather than the whole run
    pub fn is_per_source(&self) -> bool {
        matches!(self, SnapshotError::SourceUnreadable { .. })
    }
}

/// Result type for snapshot operations
pub type Result<T> = std::result::Result<T, SnapshotError>;
