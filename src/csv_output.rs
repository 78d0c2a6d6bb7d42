//! CSV output format for snapshot analyses
//!
//! Emits one block per distribution, separated by blank lines, for
//! spreadsheet import:
//!
//! ```text
//! gua,name,count
//! cpu,count
//! element,name,count
//! gua,cpu,count
//! sample,key,source,<gua names...>,<CPU columns...>   (timeline only)
//! ```

use crate::analysis::Analysis;
use crate::config::RenderConfig;
use crate::timeline::Timeline;
use crate::trigram::{element_domain, gua_domain, label_for};

/// CSV output formatter
#[derive(Debug)]
pub struct CsvOutput<'a> {
    analysis: &'a Analysis,
    config: &'a RenderConfig,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter
    pub fn new(analysis: &'a Analysis, config: &'a RenderConfig) -> Self {
        Self { analysis, config }
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Gua distribution block
    pub fn gua_table(&self) -> String {
        let section = &self.analysis.cross_section;
        let mut output = String::from("gua,name,count\n");
        for g in gua_domain() {
            output.push_str(&format!(
                "{},{},{}\n",
                g,
                Self::escape_field(&label_for(&self.config.gua_names, g)),
                section.gua_count(g)
            ));
        }
        output
    }

    /// CPU distribution block
    pub fn cpu_table(&self) -> String {
        let mut output = String::from("cpu,count\n");
        for (cpu, count) in &self.analysis.cross_section.cpu {
            output.push_str(&format!("{},{}\n", cpu, count));
        }
        output
    }

    /// Element distribution block
    pub fn element_table(&self) -> String {
        let section = &self.analysis.cross_section;
        let mut output = String::from("element,name,count\n");
        for e in element_domain() {
            output.push_str(&format!(
                "{},{},{}\n",
                e,
                Self::escape_field(&label_for(&self.config.element_names, e)),
                section.element_count(e)
            ));
        }
        output
    }

    /// Non-zero gua x CPU cells
    pub fn heatmap_table(&self) -> String {
        let mut output = String::from("gua,cpu,count\n");
        for (gua, row) in &self.analysis.cross_section.gua_by_cpu {
            for (cpu, count) in row {
                output.push_str(&format!("{},{},{}\n", gua, cpu, count));
            }
        }
        output
    }

    /// One row per successfully processed snapshot
    pub fn timeline_table(&self, timeline: &Timeline) -> String {
        let mut headers = vec!["sample".to_string(), "key".to_string(), "source".to_string()];
        headers.extend(
            gua_domain().map(|g| Self::escape_field(&label_for(&self.config.gua_names, g))),
        );
        headers.extend(timeline.cpu.keys().map(|c| format!("CPU{}", c)));

        let mut output = headers.join(",");
        output.push('\n');

        for i in 0..timeline.len() {
            let mut fields = vec![
                i.to_string(),
                timeline.keys[i].value.to_string(),
                Self::escape_field(&timeline.sources[i].display().to_string()),
            ];
            fields.extend(timeline.gua.iter().map(|s| s[i].to_string()));
            fields.extend(timeline.cpu.values().map(|s| s[i].to_string()));
            output.push_str(&fields.join(","));
            output.push('\n');
        }

        output
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut blocks = vec![
            self.gua_table(),
            self.cpu_table(),
            self.element_table(),
            self.heatmap_table(),
        ];
        if let Some(timeline) = &self.analysis.timeline {
            blocks.push(self.timeline_table(timeline));
        }
        blocks.join("\n")
    }
}
