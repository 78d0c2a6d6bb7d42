//! Cross-sectional aggregation of one snapshot
//!
//! A single linear pass over the normalized records produces four count
//! mappings: gua, CPU, element, and gua x CPU. Keys are exactly the observed
//! values, so out-of-domain values are kept rather than silently folded.

use crate::normalize::TaskRecord;
use crate::trigram::{element_domain, gua_domain};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Count mapping keyed by an observed field value
pub type Counts = BTreeMap<i64, u64>;

/// Aggregates of a single snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossSection {
    /// gua -> task count
    pub gua: Counts,
    /// assigned CPU -> task count
    pub cpu: Counts,
    /// element -> task count
    pub element: Counts,
    /// gua -> (CPU -> task count)
    pub gua_by_cpu: BTreeMap<i64, Counts>,
    /// Number of records aggregated
    pub total: u64,
}

/// Aggregate a normalized record sequence
pub fn aggregate(records: &[TaskRecord]) -> CrossSection {
    let mut section = CrossSection::default();
    for record in records {
        section.record(record);
    }
    section
}

impl CrossSection {
    /// Count one record into every mapping
    pub fn record(&mut self, record: &TaskRecord) {
        *self.gua.entry(record.gua).or_default() += 1;
        *self.cpu.entry(record.cpu).or_default() += 1;
        *self.element.entry(record.element).or_default() += 1;
        *self
            .gua_by_cpu
            .entry(record.gua)
            .or_default()
            .entry(record.cpu)
            .or_default() += 1;
        self.total += 1;
    }

    /// Count for a gua, zero when unobserved
    pub fn gua_count(&self, gua: i64) -> u64 {
        self.gua.get(&gua).copied().unwrap_or(0)
    }

    /// Count for a CPU, zero when unobserved
    pub fn cpu_count(&self, cpu: i64) -> u64 {
        self.cpu.get(&cpu).copied().unwrap_or(0)
    }

    /// Count for an element, zero when unobserved
    pub fn element_count(&self, element: i64) -> u64 {
        self.element.get(&element).copied().unwrap_or(0)
    }

    /// Count for one gua/CPU cell, zero when unobserved
    pub fn cell(&self, gua: i64, cpu: i64) -> u64 {
        self.gua_by_cpu
            .get(&gua)
            .and_then(|row| row.get(&cpu))
            .copied()
            .unwrap_or(0)
    }

    /// Gua counts over the fixed 0..=7 domain
    pub fn dense_gua(&self) -> Vec<u64> {
        gua_domain().map(|g| self.gua_count(g)).collect()
    }

    /// Element counts over the fixed 0..=4 domain
    pub fn dense_element(&self) -> Vec<u64> {
        element_domain().map(|e| self.element_count(e)).collect()
    }

    /// Observed CPUs in ascending order
    pub fn cpus(&self) -> Vec<i64> {
        self.cpu.keys().copied().collect()
    }

    /// Heatmap matrix: one row per fixed gua, one column per observed CPU
    pub fn heatmap(&self) -> Vec<Vec<u64>> {
        let cpus = self.cpus();
        gua_domain()
            .map(|g| cpus.iter().map(|&c| self.cell(g, c)).collect())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
