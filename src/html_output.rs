//! HTML output format for snapshot reports
//!
//! Self-contained page with embedded CSS, the inline SVG charts, count
//! tables, and the list of snapshots skipped while building the timeline.

use crate::analysis::Analysis;
use crate::config::RenderConfig;
use crate::svg_output::render_charts;
use crate::trigram::{element_domain, gua_domain, label_for};

/// Escape HTML special characters to prevent XSS
///
/// Also used for SVG text and attributes, which share the same entities.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// HTML report formatter
#[derive(Debug)]
pub struct HtmlOutput<'a> {
    analysis: &'a Analysis,
    config: &'a RenderConfig,
}

impl<'a> HtmlOutput<'a> {
    /// Create a new HTML output formatter
    pub fn new(analysis: &'a Analysis, config: &'a RenderConfig) -> Self {
        Self { analysis, config }
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 6px 10px;
            text-align: right;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        .chart {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
            display: inline-block;
        }
        .summary td:first-child {
            text-align: left;
            font-weight: bold;
        }
        .skipped th {
            background-color: #d9534f;
        }
        .skipped td {
            text-align: left;
            font-family: monospace;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    fn render_summary(&self) -> String {
        let a = self.analysis;
        let mut html = String::new();
        html.push_str("    <h2>Summary</h2>\n");
        html.push_str("    <table class=\"summary\">\n");
        let rows = [
            ("Snapshot", escape_html(&a.snapshot.display().to_string())),
            ("Timestamp", a.timestamp.to_string()),
            ("Tasks", a.cross_section.total.to_string()),
            ("Dropped records", a.dropped_records.to_string()),
            ("Sources", a.source_count.to_string()),
            (
                "Timeline samples",
                a.timeline
                    .as_ref()
                    .map(|t| t.len().to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ];
        for (label, value) in rows {
            html.push_str(&format!(
                "        <tr><td>{}</td><td>{}</td></tr>\n",
                label, value
            ));
        }
        html.push_str("    </table>\n");
        html
    }

    fn render_distributions(&self) -> String {
        let section = &self.analysis.cross_section;
        let mut html = String::new();

        html.push_str("    <h2>Gua Distribution</h2>\n");
        html.push_str("    <table>\n        <tr><th>Gua</th><th>Name</th><th>Tasks</th></tr>\n");
        for g in gua_domain() {
            html.push_str(&format!(
                "        <tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                g,
                escape_html(&label_for(&self.config.gua_names, g)),
                section.gua_count(g)
            ));
        }
        html.push_str("    </table>\n");

        html.push_str("    <h2>CPU Distribution</h2>\n");
        html.push_str("    <table>\n        <tr><th>CPU</th><th>Tasks</th></tr>\n");
        for (cpu, count) in &section.cpu {
            html.push_str(&format!(
                "        <tr><td>{}</td><td>{}</td></tr>\n",
                cpu, count
            ));
        }
        html.push_str("    </table>\n");

        html.push_str("    <h2>Element Distribution</h2>\n");
        html.push_str(
            "    <table>\n        <tr><th>Element</th><th>Name</th><th>Tasks</th></tr>\n",
        );
        for e in element_domain() {
            html.push_str(&format!(
                "        <tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                e,
                escape_html(&label_for(&self.config.element_names, e)),
                section.element_count(e)
            ));
        }
        html.push_str("    </table>\n");

        html
    }

    fn render_skipped(&self) -> String {
        if self.analysis.skipped.is_empty() {
            return String::new();
        }

        let mut html = String::new();
        html.push_str("    <h2>Skipped Snapshots</h2>\n");
        html.push_str("    <table class=\"skipped\">\n");
        html.push_str("        <tr><th>Source</th><th>Reason</th></tr>\n");
        for skipped in &self.analysis.skipped {
            html.push_str(&format!(
                "        <tr><td>{}</td><td>{}</td></tr>\n",
                escape_html(&skipped.path.display().to_string()),
                escape_html(&skipped.reason)
            ));
        }
        html.push_str("    </table>\n");
        html
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str("    <title>Guascope Snapshot Report</title>\n");
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str("    <h1>Scheduler Snapshot Report</h1>\n");

        html.push_str(&self.render_summary());

        html.push_str("    <h2>Charts</h2>\n");
        for chart in render_charts(self.analysis, self.config) {
            html.push_str(&format!(
                "    <div class=\"chart\" title=\"{}\">\n",
                escape_html(chart.title)
            ));
            html.push_str(&chart.svg);
            html.push_str("    </div>\n");
        }

        html.push_str(&self.render_distributions());
        html.push_str(&self.render_skipped());

        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by Guascope - Scheduler Snapshot Aggregator\n");
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::normalize::TaskRecord;
    use crate::timeline::SkippedSnapshot;
    use std::path::PathBuf;

    fn analysis(skipped: Vec<SkippedSnapshot>) -> Analysis {
        Analysis {
            snapshot: PathBuf::from("scx/task_ctx_3.json"),
            timestamp: 3,
            cross_section: aggregate(&[TaskRecord { gua: 2, cpu: 1, element: 1 }]),
            dropped_records: 0,
            source_count: 1,
            timeline: None,
            skipped,
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a&b"), "a&amp;b");
        assert_eq!(escape_html("\"test\""), "&quot;test&quot;");
        assert_eq!(escape_html("'test'"), "&#39;test&#39;");
    }

    #[test]
    fn test_html_output_basic_structure() {
        let analysis = analysis(Vec::new());
        let config = RenderConfig::default();
        let html = HtmlOutput::new(&analysis, &config).to_html();

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<head>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<svg"));
        assert!(html.contains("<td>KAN</td><td>1</td>"));
        assert!(!html.contains("Skipped Snapshots"));
    }

    #[test]
    fn test_names_escaped_in_tables_and_charts() {
        let analysis = analysis(Vec::new());
        let mut config = RenderConfig::default();
        config.gua_names[2] = "<K&N>".to_string();
        let html = HtmlOutput::new(&analysis, &config).to_html();

        // Once in the gua table, once in each gua chart (bar and heatmap)
        assert_eq!(html.matches("&lt;K&amp;N&gt;").count(), 3);
        assert!(!html.contains("<K&N>"));
    }

    #[test]
    fn test_html_output_lists_skipped() {
        let analysis = analysis(vec![SkippedSnapshot {
            path: PathBuf::from("scx/task_ctx_1.json"),
            reason: "<broken>".to_string(),
        }]);
        let config = RenderConfig::default();
        let html = HtmlOutput::new(&analysis, &config).to_html();

        assert!(html.contains("Skipped Snapshots"));
        assert!(html.contains("scx/task_ctx_1.json"));
        assert!(html.contains("&lt;broken&gt;"));
        assert!(!html.contains("<broken>"));
    }
}
