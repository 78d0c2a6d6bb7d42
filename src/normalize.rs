//! Record normalizer
//!
//! Snapshots come in two shapes depending on the producer:
//!
//! ```text
//! {"tasks": [ ... ], "timestamp": 1700000000}    // enveloped with metadata
//! [ ... ]                                        // bare sequence
//! ```
//!
//! Each task record is either a mapping or a mapping wrapped one level deep
//! under `"value"` (the layout of a dumped BPF map). Both snapshot shapes and
//! both record shapes normalize to the same [`TaskRecord`] sequence.

use crate::error::{Result, SnapshotError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// JSON field holding the record sequence in enveloped snapshots
pub const TASKS_FIELD: &str = "tasks";
/// JSON field holding the snapshot timestamp in enveloped snapshots
pub const TIMESTAMP_FIELD: &str = "timestamp";
/// JSON field of a one-level record envelope
pub const VALUE_FIELD: &str = "value";

/// JSON field names of a task record
pub const GUA_FIELD: &str = "current_gua";
pub const CPU_FIELD: &str = "assigned_cpu";
pub const ELEMENT_FIELD: &str = "current_element";

/// Canonical task record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Trigram classification (0..=7 when well formed)
    pub gua: i64,
    /// Assigned CPU
    pub cpu: i64,
    /// Element classification (0..=4 when well formed)
    pub element: i64,
}

impl TaskRecord {
    /// Read a record from a mapping; absent or non-integer fields default to 0
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            gua: int_field(map, GUA_FIELD),
            cpu: int_field(map, CPU_FIELD),
            element: int_field(map, ELEMENT_FIELD),
        }
    }
}

fn int_field(map: &Map<String, Value>, key: &str) -> i64 {
    map.get(key).and_then(as_integer).unwrap_or(0)
}

/// Integer view of a JSON value; integral floats are accepted
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    }
}

/// Shape classification of one record candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordShape<'a> {
    /// A mapping used as-is
    Direct(&'a Map<String, Value>),
    /// A mapping found under the `"value"` field of an envelope
    Enveloped(&'a Map<String, Value>),
    /// Anything that does not resolve to a mapping; excluded from aggregates
    Malformed,
}

impl<'a> RecordShape<'a> {
    /// Classify a candidate, unwrapping at most one `"value"` envelope
    pub fn classify(candidate: &'a Value) -> Self {
        match candidate {
            Value::Object(map) => match map.get(VALUE_FIELD) {
                Some(Value::Object(inner)) => RecordShape::Enveloped(inner),
                Some(_) => RecordShape::Malformed,
                None => RecordShape::Direct(map),
            },
            _ => RecordShape::Malformed,
        }
    }

    /// The resolved mapping, if any
    pub fn mapping(&self) -> Option<&'a Map<String, Value>> {
        match self {
            RecordShape::Direct(map) | RecordShape::Enveloped(map) => Some(map),
            RecordShape::Malformed => None,
        }
    }
}

/// Normalized content of one snapshot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedSnapshot {
    /// Retained records, in source order
    pub records: Vec<TaskRecord>,
    /// Embedded timestamp, 0 when absent
    pub timestamp: i64,
    /// Candidates dropped because they did not resolve to a mapping
    pub dropped: usize,
}

/// Extract task records and the embedded timestamp from raw snapshot content
///
/// `source` is only used to label errors.
pub fn extract(raw: &Value, source: &Path) -> Result<NormalizedSnapshot> {
    let (container, timestamp) = match raw {
        Value::Object(map) if map.contains_key(TASKS_FIELD) => {
            let timestamp = map.get(TIMESTAMP_FIELD).and_then(as_integer).unwrap_or(0);
            (&map[TASKS_FIELD], timestamp)
        }
        other => (other, 0),
    };

    // Iterating a mapping or a string yields keys or characters, never records
    let (candidates, opaque) = match container {
        Value::Array(items) => (items.as_slice(), 0),
        Value::Object(map) => (&[][..], map.len()),
        Value::String(text) => (&[][..], text.chars().count()),
        _ => {
            return Err(SnapshotError::unreadable(
                source,
                "record container is not iterable",
            ))
        }
    };

    let mut records = Vec::with_capacity(candidates.len());
    let mut dropped = opaque;

    for candidate in candidates {
        match RecordShape::classify(candidate).mapping() {
            Some(map) => records.push(TaskRecord::from_map(map)),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(
            source = %source.display(),
            dropped,
            "dropped records that are not mappings"
        );
    }

    Ok(NormalizedSnapshot {
        records,
        timestamp,
        dropped,
    })
}
