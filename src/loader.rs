//! Snapshot loader
//!
//! Reads one snapshot file and returns its parsed JSON content unchanged.
//! No schema is assumed here; shape handling lives in [`crate::normalize`].

use crate::error::{Result, SnapshotError};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load and parse a snapshot source
///
/// Fails with [`SnapshotError::SourceUnreadable`] if the file cannot be read
/// or is not valid JSON. Callers decide whether to skip or abort.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path_ref = path.as_ref();

    let contents =
        fs::read_to_string(path_ref).map_err(|e| SnapshotError::unreadable(path_ref, e))?;

    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| SnapshotError::unreadable(path_ref, format!("invalid JSON: {}", e)))?;

    tracing::trace!(path = %path_ref.display(), bytes = contents.len(), "loaded snapshot");

    Ok(value)
}
