// Integration test utilities
//
// Helpers for building snapshot directories on disk

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A temporary directory of snapshot files
pub struct SnapshotDir {
    pub dir: TempDir,
}

impl SnapshotDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Write raw text under `name` and return its path
    pub fn write_raw(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    /// Write a JSON value under `name`
    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        self.write_raw(name, &serde_json::to_string(value).unwrap())
    }

    /// Write an enveloped snapshot `task_ctx_<ts>.json`
    pub fn write_snapshot(&self, ts: i64, tasks: Value) -> PathBuf {
        self.write_json(
            &format!("task_ctx_{}.json", ts),
            &json!({"tasks": tasks, "timestamp": ts}),
        )
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }
}

/// A task record with all three fields set
pub fn task(gua: i64, cpu: i64, element: i64) -> Value {
    json!({"current_gua": gua, "assigned_cpu": cpu, "current_element": element})
}

/// The same record wrapped in a BPF-map style envelope
pub fn enveloped(gua: i64, cpu: i64, element: i64) -> Value {
    json!({"key": 0, "value": task(gua, cpu, element)})
}
