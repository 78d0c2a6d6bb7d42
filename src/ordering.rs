//! Ordering-key recovery for snapshots
//!
//! Snapshot files are normally named `task_ctx_<N>.json`, where `N` is the
//! sampling time. When the name does not carry a usable token the timestamp
//! embedded in the snapshot is used instead. Strategies are tried in order
//! and the first success wins.
//!
//! The key is informational: snapshots keep their discovery order.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where an ordering key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    /// Third `_`-delimited segment of the file name, before any `.`
    FilenameToken,
    /// `timestamp` field of the snapshot (0 when absent)
    EmbeddedTimestamp,
}

/// Default strategy order
pub const DEFAULT_STRATEGIES: [KeyStrategy; 2] =
    [KeyStrategy::FilenameToken, KeyStrategy::EmbeddedTimestamp];

/// A recovered ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingKey {
    pub value: i64,
    pub strategy: KeyStrategy,
}

impl KeyStrategy {
    /// Try this strategy against one snapshot
    pub fn extract(self, path: &Path, embedded_timestamp: i64) -> Option<i64> {
        match self {
            KeyStrategy::FilenameToken => filename_token(path),
            KeyStrategy::EmbeddedTimestamp => Some(embedded_timestamp),
        }
    }
}

/// Parse the integer token from a name like `task_ctx_1700000000.json`
pub fn filename_token(path: &Path) -> Option<i64> {
    let name = path.file_name()?.to_str()?;
    let segment = name.split('_').nth(2)?;
    let token = segment.split('.').next()?;
    token.trim().parse().ok()
}

/// Derive a key by trying `strategies` in order
pub fn derive_key(
    path: &Path,
    embedded_timestamp: i64,
    strategies: &[KeyStrategy],
) -> Option<OrderingKey> {
    strategies.iter().find_map(|&strategy| {
        strategy
            .extract(path, embedded_timestamp)
            .map(|value| OrderingKey { value, strategy })
    })
}
