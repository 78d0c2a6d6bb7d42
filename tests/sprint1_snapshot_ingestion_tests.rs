//! Sprint 1: Snapshot loading, normalization and cross-section aggregation
//!
//! Acceptance criteria: both snapshot shapes and both record shapes
//! normalize identically, and non-mapping records never reach an aggregate.

mod utils;

use guascope::aggregate::aggregate;
use guascope::loader::load;
use guascope::normalize::{extract, TaskRecord};
use guascope::SnapshotError;
use serde_json::json;
use utils::{enveloped, task, SnapshotDir};

// ============================================================================
// Loader
// ============================================================================

#[test]
fn test_load_returns_content_unchanged() {
    let snaps = SnapshotDir::new();
    let body = json!({"tasks": [task(1, 2, 3)], "timestamp": 10, "extra": {"nested": [1, 2]}});
    let path = snaps.write_json("task_ctx_10.json", &body);

    assert_eq!(load(&path).unwrap(), body);
}

#[test]
fn test_load_unreadable_sources() {
    let snaps = SnapshotDir::new();
    let truncated = snaps.write_raw("task_ctx_1.json", "[{\"current_gua\": 1");

    assert!(matches!(
        load(&truncated),
        Err(SnapshotError::SourceUnreadable { .. })
    ));
    assert!(matches!(
        load(snaps.path().join("task_ctx_404.json")),
        Err(SnapshotError::SourceUnreadable { .. })
    ));
}

// ============================================================================
// Normalizer
// ============================================================================

#[test]
fn test_enveloped_and_bare_snapshots_match() {
    let snaps = SnapshotDir::new();
    let tasks = json!([task(0, 1, 2), enveloped(3, 4, 0), 42, "junk"]);
    let object = snaps.write_json("task_ctx_1.json", &json!({"tasks": tasks, "timestamp": 5}));
    let bare = snaps.write_json("task_ctx_2.json", &tasks);

    let a = extract(&load(&object).unwrap(), &object).unwrap();
    let b = extract(&load(&bare).unwrap(), &bare).unwrap();

    assert_eq!(a.records, b.records);
    assert_eq!(a.dropped, 2);
    assert_eq!(a.timestamp, 5);
    assert_eq!(b.timestamp, 0);
}

#[test]
fn test_value_envelope_equivalence() {
    let snaps = SnapshotDir::new();
    let path = snaps.path().join("x.json");
    let wrapped = extract(&json!([{"value": {"current_gua": 3}}]), &path).unwrap();
    let plain = extract(&json!([{"current_gua": 3}]), &path).unwrap();

    assert_eq!(wrapped.records, plain.records);
    assert_eq!(
        wrapped.records,
        vec![TaskRecord {
            gua: 3,
            cpu: 0,
            element: 0
        }]
    );
}

#[test]
fn test_plain_integer_record_affects_nothing() {
    let snaps = SnapshotDir::new();
    let path = snaps.path().join("x.json");
    let with_int = extract(&json!([task(2, 0, 1), 17]), &path).unwrap();
    let without = extract(&json!([task(2, 0, 1)]), &path).unwrap();

    assert_eq!(aggregate(&with_int.records), aggregate(&without.records));
}

// ============================================================================
// Aggregator
// ============================================================================

#[test]
fn test_cross_section_sums_agree() {
    let snaps = SnapshotDir::new();
    let path = snaps.write_snapshot(
        1,
        json!([
            task(0, 0, 0),
            task(1, 1, 1),
            enveloped(1, 1, 4),
            task(7, 3, 2),
            {"value": 9},
            {},
        ]),
    );

    let snapshot = extract(&load(&path).unwrap(), &path).unwrap();
    let section = aggregate(&snapshot.records);

    assert_eq!(snapshot.records.len(), 5);
    assert_eq!(section.total, 5);
    assert_eq!(section.gua.values().sum::<u64>(), 5);
    assert_eq!(section.cpu.values().sum::<u64>(), 5);
    assert_eq!(section.element.values().sum::<u64>(), 5);
    // The empty mapping defaults every field to 0
    assert_eq!(section.gua_count(0), 2);
    assert_eq!(section.cell(1, 1), 2);
}

#[test]
fn test_heatmap_covers_all_gua_rows() {
    let section = aggregate(&[
        TaskRecord {
            gua: 2,
            cpu: 8,
            element: 0,
        },
        TaskRecord {
            gua: 2,
            cpu: 1,
            element: 0,
        },
    ]);

    let matrix = section.heatmap();
    assert_eq!(matrix.len(), 8);
    assert_eq!(section.cpus(), vec![1, 8]);
    assert_eq!(matrix[2], vec![1, 1]);
    assert!(matrix[0].iter().all(|&c| c == 0));
}
