//! JSON output format for snapshot analyses
//!
//! `--format json` implementation. Count mappings are emitted as arrays of
//! labelled entries so consumers do not have to parse integer map keys.

use crate::analysis::Analysis;
use crate::config::RenderConfig;
use crate::trigram::{element_domain, gua_domain, label_for};
use serde::{Deserialize, Serialize};

/// A count for one labelled value of a fixed domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonCount {
    pub value: i64,
    pub name: String,
    pub count: u64,
}

/// A count for one CPU
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonCpuCount {
    pub cpu: i64,
    pub count: u64,
}

/// One non-zero gua x CPU cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonCell {
    pub gua: i64,
    pub cpu: i64,
    pub count: u64,
}

/// A labelled count sequence over samples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSeries {
    pub label: String,
    pub values: Vec<u64>,
}

/// Timeline section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonTimeline {
    /// Ordering key per sample
    pub keys: Vec<i64>,
    /// Source file per sample
    pub sources: Vec<String>,
    pub gua: Vec<JsonSeries>,
    pub cpu: Vec<JsonSeries>,
}

/// A snapshot left out of the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSkipped {
    pub source: String,
    pub reason: String,
}

/// Summary numbers for the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSummary {
    /// Tasks in the last snapshot
    pub total_tasks: u64,
    /// Records of the last snapshot that were not mappings
    pub dropped_records: usize,
    /// Discovered snapshot sources
    pub sources: usize,
    /// Embedded timestamp of the last snapshot
    pub timestamp: i64,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// Snapshot used for the cross-section
    pub snapshot: String,
    pub summary: JsonSummary,
    pub gua: Vec<JsonCount>,
    pub cpu: Vec<JsonCpuCount>,
    pub element: Vec<JsonCount>,
    pub gua_cpu: Vec<JsonCell>,
    /// Present when at least two snapshots were processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<JsonTimeline>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<JsonSkipped>,
}

impl JsonOutput {
    /// Build the JSON view of an analysis
    pub fn from_analysis(analysis: &Analysis, config: &RenderConfig) -> Self {
        let section = &analysis.cross_section;

        let gua = gua_domain()
            .map(|g| JsonCount {
                value: g,
                name: label_for(&config.gua_names, g),
                count: section.gua_count(g),
            })
            .collect();

        let element = element_domain()
            .map(|e| JsonCount {
                value: e,
                name: label_for(&config.element_names, e),
                count: section.element_count(e),
            })
            .collect();

        let cpu = section
            .cpu
            .iter()
            .map(|(&cpu, &count)| JsonCpuCount { cpu, count })
            .collect();

        let gua_cpu = section
            .gua_by_cpu
            .iter()
            .flat_map(|(&gua, row)| {
                row.iter()
                    .map(move |(&cpu, &count)| JsonCell { gua, cpu, count })
            })
            .collect();

        let timeline = analysis.timeline.as_ref().map(|t| JsonTimeline {
            keys: t.keys.iter().map(|k| k.value).collect(),
            sources: t.sources.iter().map(|p| p.display().to_string()).collect(),
            gua: gua_domain()
                .zip(&t.gua)
                .map(|(g, values)| JsonSeries {
                    label: label_for(&config.gua_names, g),
                    values: values.clone(),
                })
                .collect(),
            cpu: t
                .cpu
                .iter()
                .map(|(cpu, values)| JsonSeries {
                    label: format!("CPU{}", cpu),
                    values: values.clone(),
                })
                .collect(),
        });

        let skipped = analysis
            .skipped
            .iter()
            .map(|s| JsonSkipped {
                source: s.path.display().to_string(),
                reason: s.reason.clone(),
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "guascope-json-v1".to_string(),
            snapshot: analysis.snapshot.display().to_string(),
            summary: JsonSummary {
                total_tasks: section.total,
                dropped_records: analysis.dropped_records,
                sources: analysis.source_count,
                timestamp: analysis.timestamp,
            },
            gua,
            cpu,
            element,
            gua_cpu,
            timeline,
            skipped,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::normalize::TaskRecord;
    use crate::timeline::SkippedSnapshot;
    use std::path::PathBuf;

    fn analysis() -> Analysis {
        let records = [
            TaskRecord { gua: 1, cpu: 0, element: 2 },
            TaskRecord { gua: 1, cpu: 3, element: 2 },
        ];
        Analysis {
            snapshot: PathBuf::from("scx/task_ctx_9.json"),
            timestamp: 9,
            cross_section: aggregate(&records),
            dropped_records: 1,
            source_count: 2,
            timeline: None,
            skipped: vec![SkippedSnapshot {
                path: PathBuf::from("scx/task_ctx_1.json"),
                reason: "invalid JSON".to_string(),
            }],
        }
    }

    #[test]
    fn test_json_output_structure() {
        let output = JsonOutput::from_analysis(&analysis(), &RenderConfig::default());

        assert_eq!(output.format, "guascope-json-v1");
        assert_eq!(output.gua.len(), 8);
        assert_eq!(output.element.len(), 5);
        assert_eq!(output.gua[1].count, 2);
        assert_eq!(output.gua[1].name, "ZHEN");
        assert_eq!(output.cpu.len(), 2);
        assert_eq!(output.gua_cpu.len(), 2);
        assert_eq!(output.summary.total_tasks, 2);
        assert_eq!(output.summary.dropped_records, 1);
    }

    #[test]
    fn test_json_serialization() {
        let json = JsonOutput::from_analysis(&analysis(), &RenderConfig::default())
            .to_json()
            .unwrap();

        assert!(json.contains("\"format\": \"guascope-json-v1\""));
        assert!(json.contains("\"snapshot\": \"scx/task_ctx_9.json\""));
        assert!(json.contains("\"reason\": \"invalid JSON\""));
    }

    #[test]
    fn test_timeline_omitted_when_absent() {
        let json = JsonOutput::from_analysis(&analysis(), &RenderConfig::default())
            .to_json()
            .unwrap();
        assert!(!json.contains("\"timeline\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["gua"][1]["count"], 2);
        assert_eq!(value["cpu"][1]["cpu"], 3);
    }
}
