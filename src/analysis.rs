//! Analysis driver
//!
//! Ties the pipeline together for one run:
//! - the cross-section comes from the last discovered snapshot and a failure
//!   there is terminal;
//! - with more than one source, a timeline is built over all of them and bad
//!   sources are skipped.

use crate::aggregate::{aggregate, CrossSection};
use crate::error::{Result, SnapshotError};
use crate::loader;
use crate::normalize;
use crate::timeline::{SkippedSnapshot, Timeline, TimelineBuilder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything the rendering layer needs from one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// Snapshot used for the cross-section (the last discovered one)
    pub snapshot: PathBuf,
    /// Timestamp embedded in that snapshot (0 when absent)
    pub timestamp: i64,
    /// Distributions of the last snapshot
    pub cross_section: CrossSection,
    /// Records of the last snapshot dropped as non-mappings
    pub dropped_records: usize,
    /// Number of discovered sources
    pub source_count: usize,
    /// Present when at least two snapshots were processed successfully
    pub timeline: Option<Timeline>,
    /// Sources excluded from the timeline
    pub skipped: Vec<SkippedSnapshot>,
}

impl Analysis {
    pub fn has_timeline(&self) -> bool {
        self.timeline.is_some()
    }
}

/// Run the aggregation pipeline over discovered sources
///
/// `location` describes where sources were looked up and only labels the
/// `EmptyInputSet` error.
pub fn analyze(sources: &[PathBuf], location: &str) -> Result<Analysis> {
    let Some(last) = sources.last() else {
        return Err(SnapshotError::EmptyInputSet {
            location: location.to_string(),
        });
    };

    let raw = loader::load(last)?;
    let snapshot = normalize::extract(&raw, last)?;
    let cross_section = aggregate(&snapshot.records);

    tracing::info!(
        snapshot = %last.display(),
        tasks = cross_section.total,
        cpus = cross_section.cpu.len(),
        "cross-section aggregated"
    );

    let outcome = if sources.len() > 1 {
        TimelineBuilder::new().build_with_last(sources, &snapshot)
    } else {
        Default::default()
    };

    Ok(Analysis {
        snapshot: last.clone(),
        timestamp: snapshot.timestamp,
        cross_section,
        dropped_records: snapshot.dropped,
        source_count: sources.len(),
        timeline: outcome.timeline,
        skipped: outcome.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_sources_is_terminal() {
        let err = analyze(&[], "./scx/task_ctx_*.json").unwrap_err();
        assert!(matches!(err, SnapshotError::EmptyInputSet { .. }));
    }

    #[test]
    fn test_single_source_has_no_timeline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("task_ctx_1.json");
        fs::write(
            &path,
            r#"{"tasks":[{"current_gua":4,"assigned_cpu":1,"current_element":3}],"timestamp":12}"#,
        )
        .unwrap();

        let analysis = analyze(&[path.clone()], "test").unwrap();
        assert_eq!(analysis.snapshot, path);
        assert_eq!(analysis.timestamp, 12);
        assert_eq!(analysis.cross_section.gua_count(4), 1);
        assert_eq!(analysis.cross_section.element_count(3), 1);
        assert!(!analysis.has_timeline());
        assert!(analysis.skipped.is_empty());
    }

    #[test]
    fn test_unreadable_last_source_is_terminal() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("task_ctx_1.json");
        let bad = dir.path().join("task_ctx_2.json");
        fs::write(&good, "[]").unwrap();
        fs::write(&bad, "garbage").unwrap();

        let err = analyze(&[good, bad], "test").unwrap_err();
        assert!(matches!(err, SnapshotError::SourceUnreadable { .. }));
    }

    #[test]
    fn test_cross_section_uses_last_source() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("task_ctx_1.json");
        let last = dir.path().join("task_ctx_2.json");
        fs::write(&first, r#"[{"current_gua":1},{"current_gua":1}]"#).unwrap();
        fs::write(&last, r#"[{"value":{"current_gua":6}}, 3]"#).unwrap();

        let analysis = analyze(&[first, last], "test").unwrap();
        assert_eq!(analysis.cross_section.total, 1);
        assert_eq!(analysis.cross_section.gua_count(6), 1);
        assert_eq!(analysis.dropped_records, 1);
        assert_eq!(analysis.timeline.unwrap().len(), 2);
    }
}
