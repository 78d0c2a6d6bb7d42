//! Timeline reconstruction across snapshots
//!
//! Every source is loaded, normalized and aggregated in discovery order. A
//! source that fails is logged and skipped (its index is dropped, not zero
//! filled), so one bad snapshot never aborts the run.
//!
//! Gua sequences cover the fixed 0..=7 domain. CPU sequences cover only the
//! CPUs present in the last successfully processed snapshot; CPUs that
//! disappeared before then are not charted.

use crate::aggregate::{aggregate, CrossSection};
use crate::error::Result;
use crate::loader;
use crate::normalize::{self, NormalizedSnapshot};
use crate::ordering::{derive_key, KeyStrategy, OrderingKey, DEFAULT_STRATEGIES};
use crate::trigram::{gua_domain, GUA_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Minimum number of successful snapshots for a timeline to be emitted
pub const MIN_TIMELINE_SNAPSHOTS: usize = 2;

/// A source excluded from the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSnapshot {
    pub path: PathBuf,
    pub reason: String,
}

/// Aligned per-gua and per-CPU count sequences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// Ordering key of each successfully processed snapshot
    pub keys: Vec<OrderingKey>,
    /// Source of each successfully processed snapshot
    pub sources: Vec<PathBuf>,
    /// One sequence per gua 0..=7
    pub gua: Vec<Vec<u64>>,
    /// One sequence per CPU of the final snapshot
    pub cpu: BTreeMap<i64, Vec<u64>>,
}

impl Timeline {
    /// Number of samples (successful snapshots)
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sequence for one gua
    pub fn gua_series(&self, gua: i64) -> Option<&[u64]> {
        usize::try_from(gua)
            .ok()
            .and_then(|idx| self.gua.get(idx))
            .map(Vec::as_slice)
    }

    /// Sequence for one CPU, if charted
    pub fn cpu_series(&self, cpu: i64) -> Option<&[u64]> {
        self.cpu.get(&cpu).map(Vec::as_slice)
    }
}

/// Result of a timeline build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineOutcome {
    /// `None` when fewer than two snapshots were processed successfully
    pub timeline: Option<Timeline>,
    /// Sources that were skipped, in discovery order
    pub skipped: Vec<SkippedSnapshot>,
}

/// One processed snapshot awaiting CPU-domain projection
#[derive(Debug)]
struct Sample {
    source: PathBuf,
    key: OrderingKey,
    section: CrossSection,
}

/// Builds a [`Timeline`] from ordered snapshot sources
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    strategies: Vec<KeyStrategy>,
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self {
            strategies: DEFAULT_STRATEGIES.to_vec(),
        }
    }
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the ordering-key strategies (tried in order)
    pub fn with_strategies(mut self, strategies: Vec<KeyStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Process every source in order and assemble the timeline
    pub fn build(&self, sources: &[PathBuf]) -> TimelineOutcome {
        self.run(sources, None)
    }

    /// Like [`build`](Self::build), but the last source is taken from an
    /// already normalized snapshot instead of being read again
    pub fn build_with_last(
        &self,
        sources: &[PathBuf],
        last: &NormalizedSnapshot,
    ) -> TimelineOutcome {
        self.run(sources, Some(last))
    }

    fn run(&self, sources: &[PathBuf], last: Option<&NormalizedSnapshot>) -> TimelineOutcome {
        let mut samples = Vec::with_capacity(sources.len());
        let mut skipped = Vec::new();

        for (idx, path) in sources.iter().enumerate() {
            let result = match last {
                Some(snapshot) if idx + 1 == sources.len() => Ok(self.sample(path, snapshot)),
                _ => self.process(path),
            };
            match result {
                Ok(sample) => samples.push(sample),
                Err(e) => {
                    tracing::warn!("Skipping snapshot {}: {}", path.display(), e);
                    skipped.push(SkippedSnapshot {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            processed = samples.len(),
            skipped = skipped.len(),
            "timeline snapshots processed"
        );

        let timeline = if samples.len() >= MIN_TIMELINE_SNAPSHOTS {
            Some(assemble(samples))
        } else {
            None
        };

        TimelineOutcome { timeline, skipped }
    }

    fn process(&self, path: &Path) -> Result<Sample> {
        let raw = loader::load(path)?;
        let snapshot = normalize::extract(&raw, path)?;
        Ok(self.sample(path, &snapshot))
    }

    fn sample(&self, path: &Path, snapshot: &NormalizedSnapshot) -> Sample {
        // EmbeddedTimestamp always succeeds, so an empty strategy list is the
        // only way to end up without a key
        let key = derive_key(path, snapshot.timestamp, &self.strategies).unwrap_or(OrderingKey {
            value: snapshot.timestamp,
            strategy: KeyStrategy::EmbeddedTimestamp,
        });

        let section = aggregate(&snapshot.records);
        tracing::debug!(
            source = %path.display(),
            key = key.value,
            records = section.total,
            "snapshot aggregated"
        );

        Sample {
            source: path.to_path_buf(),
            key,
            section,
        }
    }
}

/// Align samples into sequences; CPU domain comes from the last sample
fn assemble(samples: Vec<Sample>) -> Timeline {
    let cpu_domain = samples
        .last()
        .map(|s| s.section.cpus())
        .unwrap_or_default();

    let mut gua: Vec<Vec<u64>> = vec![Vec::with_capacity(samples.len()); GUA_COUNT];
    let mut cpu: BTreeMap<i64, Vec<u64>> = cpu_domain
        .iter()
        .map(|&c| (c, Vec::with_capacity(samples.len())))
        .collect();
    let mut keys = Vec::with_capacity(samples.len());
    let mut sources = Vec::with_capacity(samples.len());

    for sample in samples {
        for (series, g) in gua.iter_mut().zip(gua_domain()) {
            series.push(sample.section.gua_count(g));
        }
        for (&c, series) in cpu.iter_mut() {
            series.push(sample.section.cpu_count(c));
        }
        keys.push(sample.key);
        sources.push(sample.source);
    }

    Timeline {
        keys,
        sources,
        gua,
        cpu,
    }
}
