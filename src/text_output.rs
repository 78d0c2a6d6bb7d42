//! Plain-text summary of an analysis
//!
//! Table layout in the spirit of `strace -c`: share, count, label.

use crate::analysis::Analysis;
use crate::config::RenderConfig;
use crate::trigram::{element_domain, gua_domain, label_for};
use std::fmt::Write as _;

const RULE: &str = "------ --------- ----------------";

fn percent(count: u64, total: u64) -> f64 {
    if total > 0 {
        count as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

fn table<I>(out: &mut String, heading: &str, rows: I, total: u64)
where
    I: IntoIterator<Item = (String, u64)>,
{
    let _ = writeln!(out, "\n=== {} ===", heading);
    let _ = writeln!(out, "% task     tasks label");
    let _ = writeln!(out, "{}", RULE);
    for (label, count) in rows {
        let _ = writeln!(out, "{:6.2} {:>9} {}", percent(count, total), count, label);
    }
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "100.00 {:>9} total", total);
}

/// Render the summary as text
pub fn render_summary(analysis: &Analysis, config: &RenderConfig) -> String {
    let section = &analysis.cross_section;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Snapshot: {} (timestamp {}, {} tasks, {} dropped records)",
        analysis.snapshot.display(),
        analysis.timestamp,
        section.total,
        analysis.dropped_records
    );

    table(
        &mut out,
        "Gua Distribution",
        gua_domain().map(|g| (label_for(&config.gua_names, g), section.gua_count(g))),
        section.total,
    );
    table(
        &mut out,
        "CPU Distribution",
        section.cpu.iter().map(|(c, &n)| (format!("CPU{}", c), n)),
        section.total,
    );
    table(
        &mut out,
        "Element Distribution",
        element_domain().map(|e| (label_for(&config.element_names, e), section.element_count(e))),
        section.total,
    );

    match &analysis.timeline {
        Some(timeline) => {
            let _ = writeln!(
                out,
                "\nTimeline: {} samples over {} sources, {} CPUs charted",
                timeline.len(),
                analysis.source_count,
                timeline.cpu.len()
            );
        }
        None if analysis.source_count > 1 => {
            let _ = writeln!(
                out,
                "\nTimeline: suppressed (fewer than 2 usable snapshots out of {})",
                analysis.source_count
            );
        }
        None => {}
    }

    for skipped in &analysis.skipped {
        let _ = writeln!(out, "Skipped: {} ({})", skipped.path.display(), skipped.reason);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::normalize::TaskRecord;
    use crate::timeline::SkippedSnapshot;
    use std::path::PathBuf;

    #[test]
    fn test_summary_contents() {
        let analysis = Analysis {
            snapshot: PathBuf::from("task_ctx_5.json"),
            timestamp: 5,
            cross_section: aggregate(&[
                TaskRecord { gua: 5, cpu: 0, element: 1 },
                TaskRecord { gua: 5, cpu: 1, element: 1 },
            ]),
            dropped_records: 0,
            source_count: 2,
            timeline: None,
            skipped: vec![SkippedSnapshot {
                path: PathBuf::from("task_ctx_4.json"),
                reason: "bad".to_string(),
            }],
        };

        let text = render_summary(&analysis, &RenderConfig::default());
        assert!(text.contains("=== Gua Distribution ==="));
        assert!(text.contains("100.00         2 LI"));
        assert!(text.contains(" 50.00         1 CPU1"));
        assert!(text.contains("Fire"));
        assert!(text.contains("suppressed"));
        assert!(text.contains("Skipped: task_ctx_4.json (bad)"));
    }

    #[test]
    fn test_percent_of_empty_total() {
        assert_eq!(percent(0, 0), 0.0);
    }
}
