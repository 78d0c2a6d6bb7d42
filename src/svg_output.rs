//! SVG chart rendering
//!
//! Produces the standard chart set for an [`Analysis`]:
//!
//! | File | Chart |
//! |---|---|
//! | `01_gua_dist.svg` | gua distribution of the last snapshot (bar) |
//! | `02_cpu_dist.svg` | CPU distribution of the last snapshot (bar) |
//! | `03_element_pie.svg` | element distribution (pie) |
//! | `04_gua_cpu_heatmap.svg` | gua x CPU heatmap |
//! | `05_gua_timeline.svg` | gua counts per sample (line, timeline only) |
//! | `06_cpu_timeline.svg` | CPU counts per sample (line, timeline only) |
//!
//! Charts are plain SVG strings; only aggregated numbers and the explicit
//! [`RenderConfig`] go in.

use crate::analysis::Analysis;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::html_output::escape_html;
use crate::timeline::Timeline;
use crate::trigram::{element_domain, gua_domain, label_for};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 60.0;
const FONT: &str = "-apple-system, 'Segoe UI', Roboto, 'WenQuanYi Micro Hei', sans-serif";

/// Line colours for CPU series, cycled
const CPU_SERIES_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// One rendered chart
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// File name the chart is written under
    pub file_name: &'static str,
    /// Human-readable chart title
    pub title: &'static str,
    /// SVG document
    pub svg: String,
}

/// Render every chart applicable to `analysis`
pub fn render_charts(analysis: &Analysis, config: &RenderConfig) -> Vec<Chart> {
    let section = &analysis.cross_section;
    let mut charts = Vec::with_capacity(6);

    let gua_bars: Vec<Bar> = gua_domain()
        .map(|g| Bar {
            label: label_for(&config.gua_names, g),
            value: section.gua_count(g),
            color: palette_color(&config.gua_palette, g as usize),
        })
        .collect();
    charts.push(Chart {
        file_name: "01_gua_dist.svg",
        title: "Gua Distribution - Last Snapshot",
        svg: bar_chart("Gua Distribution - Last Snapshot", &gua_bars, config),
    });

    let cpu_bars: Vec<Bar> = section
        .cpu
        .iter()
        .map(|(&cpu, &count)| Bar {
            label: format!("CPU{}", cpu),
            value: count,
            color: config.cpu_color.clone(),
        })
        .collect();
    charts.push(Chart {
        file_name: "02_cpu_dist.svg",
        title: "CPU Distribution",
        svg: bar_chart("CPU Distribution", &cpu_bars, config),
    });

    let slices: Vec<Bar> = element_domain()
        .map(|e| Bar {
            label: label_for(&config.element_names, e),
            value: section.element_count(e),
            color: palette_color(&config.element_palette, e as usize),
        })
        .filter(|s| s.value > 0)
        .collect();
    charts.push(Chart {
        file_name: "03_element_pie.svg",
        title: "Elements Distribution",
        svg: pie_chart("Elements Distribution", &slices, config),
    });

    charts.push(Chart {
        file_name: "04_gua_cpu_heatmap.svg",
        title: "Gua-CPU Heatmap",
        svg: heatmap(analysis, config),
    });

    if let Some(timeline) = &analysis.timeline {
        charts.push(Chart {
            file_name: "05_gua_timeline.svg",
            title: "Gua Timeline",
            svg: gua_timeline(timeline, config),
        });
        charts.push(Chart {
            file_name: "06_cpu_timeline.svg",
            title: "CPU Timeline",
            svg: cpu_timeline(timeline, config),
        });
    }

    charts
}

/// Render and write all charts into `dir`, creating it if needed
pub fn write_charts(analysis: &Analysis, config: &RenderConfig, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for chart in render_charts(analysis, config) {
        let path = dir.join(chart.file_name);
        fs::write(&path, &chart.svg)?;
        tracing::debug!(path = %path.display(), "chart written");
        written.push(path);
    }
    Ok(written)
}

fn palette_color(palette: &[String], idx: usize) -> String {
    if palette.is_empty() {
        return "#888888".to_string();
    }
    palette[idx % palette.len()].clone()
}

#[derive(Debug, Clone)]
struct Bar {
    label: String,
    value: u64,
    color: String,
}

fn open_svg(title: &str, config: &RenderConfig) -> String {
    let (w, h) = (config.width, config.height);
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{}">"#,
        escape_html(FONT)
    );
    let _ = writeln!(svg, r#"<rect width="{w}" height="{h}" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="30" text-anchor="middle" font-size="18" font-weight="bold">{}</text>"#,
        w as f64 / 2.0,
        escape_html(title)
    );
    svg
}

fn placeholder(svg: &mut String, config: &RenderConfig) {
    let _ = writeln!(
        svg,
        r##"<text x="{}" y="{}" text-anchor="middle" font-size="16" fill="#888">No data</text>"##,
        config.width as f64 / 2.0,
        config.height as f64 / 2.0
    );
}

/// Plot area as (x, y, width, height)
fn plot_area(config: &RenderConfig) -> (f64, f64, f64, f64) {
    let w = (config.width as f64 - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
    let h = (config.height as f64 - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
    (MARGIN_LEFT, MARGIN_TOP, w, h)
}

fn axes(svg: &mut String, config: &RenderConfig, y_label: &str, x_label: Option<&str>) {
    let (x0, y0, w, h) = plot_area(config);
    let _ = writeln!(
        svg,
        r##"<line x1="{x0}" y1="{y0}" x2="{x0}" y2="{}" stroke="#333"/>"##,
        y0 + h
    );
    let _ = writeln!(
        svg,
        r##"<line x1="{x0}" y1="{}" x2="{}" y2="{}" stroke="#333"/>"##,
        y0 + h,
        x0 + w,
        y0 + h
    );
    let _ = writeln!(
        svg,
        r#"<text x="20" y="{}" text-anchor="middle" font-size="13" transform="rotate(-90 20 {})">{}</text>"#,
        y0 + h / 2.0,
        y0 + h / 2.0,
        escape_html(y_label)
    );
    if let Some(label) = x_label {
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="13">{}</text>"#,
            x0 + w / 2.0,
            config.height as f64 - 12.0,
            escape_html(label)
        );
    }
}

fn bar_chart(title: &str, bars: &[Bar], config: &RenderConfig) -> String {
    let mut svg = open_svg(title, config);
    if bars.is_empty() {
        placeholder(&mut svg, config);
        svg.push_str("</svg>\n");
        return svg;
    }

    axes(&mut svg, config, "Task Count", None);
    let (x0, y0, w, h) = plot_area(config);
    let max = bars.iter().map(|b| b.value).max().unwrap_or(0).max(1) as f64;
    let slot = w / bars.len() as f64;
    let bar_w = slot * 0.7;

    for (i, bar) in bars.iter().enumerate() {
        let bar_h = bar.value as f64 / max * (h - 20.0);
        let x = x0 + i as f64 * slot + (slot - bar_w) / 2.0;
        let y = y0 + h - bar_h;
        let cx = x + bar_w / 2.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_w:.1}" height="{bar_h:.1}" fill="{}"/>"#,
            escape_html(&bar.color)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{cx:.1}" y="{:.1}" text-anchor="middle" font-size="12" font-weight="bold">{}</text>"#,
            y - 5.0,
            bar.value
        );
        let _ = writeln!(
            svg,
            r#"<text x="{cx:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>"#,
            y0 + h + 18.0,
            escape_html(&bar.label)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn pie_chart(title: &str, slices: &[Bar], config: &RenderConfig) -> String {
    let mut svg = open_svg(title, config);
    let total: u64 = slices.iter().map(|s| s.value).sum();
    if total == 0 {
        placeholder(&mut svg, config);
        svg.push_str("</svg>\n");
        return svg;
    }

    let (x0, y0, w, h) = plot_area(config);
    let (cx, cy) = (x0 + w / 2.0, y0 + h / 2.0);
    let r = (w.min(h) / 2.0 - 10.0).max(10.0);

    // Start at 12 o'clock, counter-clockwise like a matplotlib pie with startangle=90
    let mut angle = -std::f64::consts::FRAC_PI_2;
    for slice in slices {
        let fraction = slice.value as f64 / total as f64;
        let sweep = fraction * std::f64::consts::TAU;
        let color = escape_html(&slice.color);

        if slices.len() == 1 {
            let _ = writeln!(svg, r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{color}"/>"#);
        } else {
            let (sx, sy) = (cx + r * angle.cos(), cy + r * angle.sin());
            let end = angle - sweep;
            let (ex, ey) = (cx + r * end.cos(), cy + r * end.sin());
            let large = if sweep > std::f64::consts::PI { 1 } else { 0 };
            let _ = writeln!(
                svg,
                r#"<path d="M {cx:.1} {cy:.1} L {sx:.1} {sy:.1} A {r:.1} {r:.1} 0 {large} 0 {ex:.1} {ey:.1} Z" fill="{color}" stroke="white"/>"#
            );
        }

        let mid = angle - sweep / 2.0;
        let (lx, ly) = (cx + r * 1.15 * mid.cos(), cy + r * 1.15 * mid.sin());
        let (px, py) = (cx + r * 0.6 * mid.cos(), cy + r * 0.6 * mid.sin());
        let _ = writeln!(
            svg,
            r#"<text x="{lx:.1}" y="{ly:.1}" text-anchor="middle" font-size="13">{}</text>"#,
            escape_html(&slice.label)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{px:.1}" y="{py:.1}" text-anchor="middle" font-size="12">{:.1}%</text>"#,
            fraction * 100.0
        );

        angle -= sweep;
    }

    svg.push_str("</svg>\n");
    svg
}

/// Interpolate the yellow-orange-red ramp at `t` in [0, 1]
fn heat_color(t: f64) -> String {
    const LOW: (f64, f64, f64) = (255.0, 255.0, 204.0);
    const MID: (f64, f64, f64) = (253.0, 141.0, 60.0);
    const HIGH: (f64, f64, f64) = (189.0, 0.0, 38.0);

    let t = t.clamp(0.0, 1.0);
    let (a, b, local) = if t < 0.5 {
        (LOW, MID, t * 2.0)
    } else {
        (MID, HIGH, (t - 0.5) * 2.0)
    };
    let lerp = |x: f64, y: f64| (x + (y - x) * local).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        lerp(a.0, b.0),
        lerp(a.1, b.1),
        lerp(a.2, b.2)
    )
}

fn heatmap(analysis: &Analysis, config: &RenderConfig) -> String {
    let title = "Gua-CPU Heatmap";
    let mut svg = open_svg(title, config);
    let section = &analysis.cross_section;
    let cpus = section.cpus();
    if cpus.is_empty() {
        placeholder(&mut svg, config);
        svg.push_str("</svg>\n");
        return svg;
    }

    let matrix = section.heatmap();
    let max = matrix.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;
    let (x0, y0, w, h) = plot_area(config);
    let cell_w = w / cpus.len() as f64;
    let cell_h = h / matrix.len() as f64;

    for (row, (g, counts)) in gua_domain().zip(&matrix).enumerate() {
        let y = y0 + row as f64 * cell_h;
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{}</text>"#,
            x0 - 6.0,
            y + cell_h / 2.0 + 4.0,
            escape_html(&label_for(&config.gua_names, g))
        );
        for (col, &count) in counts.iter().enumerate() {
            let x = x0 + col as f64 * cell_w;
            let _ = writeln!(
                svg,
                r#"<rect x="{x:.1}" y="{y:.1}" width="{cell_w:.1}" height="{cell_h:.1}" fill="{}" stroke="white"/>"#,
                heat_color(count as f64 / max)
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="11" font-weight="bold">{}</text>"#,
                x + cell_w / 2.0,
                y + cell_h / 2.0 + 4.0,
                count
            );
        }
    }

    for (col, cpu) in cpus.iter().enumerate() {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="11">{}</text>"#,
            x0 + col as f64 * cell_w + cell_w / 2.0,
            y0 + h + 16.0,
            cpu
        );
    }
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13">CPU</text>"#,
        x0 + w / 2.0,
        config.height as f64 - 12.0
    );

    svg.push_str("</svg>\n");
    svg
}

struct Series<'a> {
    label: String,
    color: String,
    values: &'a [u64],
}

fn line_chart(title: &str, series: &[Series<'_>], samples: usize, config: &RenderConfig) -> String {
    let mut svg = open_svg(title, config);
    if series.is_empty() || samples == 0 {
        placeholder(&mut svg, config);
        svg.push_str("</svg>\n");
        return svg;
    }

    axes(&mut svg, config, "Task Count", Some("Sample Index"));
    let (x0, y0, w, h) = plot_area(config);
    let max = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .max()
        .unwrap_or(0)
        .max(1) as f64;
    let step = if samples > 1 { w / (samples - 1) as f64 } else { 0.0 };
    let x_at = |i: usize| if samples > 1 { x0 + i as f64 * step } else { x0 + w / 2.0 };
    let y_at = |v: u64| y0 + h - v as f64 / max * (h - 20.0);

    for i in 0..samples {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="11">{}</text>"#,
            x_at(i),
            y0 + h + 16.0,
            i
        );
    }

    for (idx, s) in series.iter().enumerate() {
        let color = escape_html(&s.color);
        let points: Vec<String> = s
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| format!("{:.1},{:.1}", x_at(i), y_at(v)))
            .collect();
        let _ = writeln!(
            svg,
            r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="2"/>"#,
            points.join(" ")
        );
        for (i, &v) in s.values.iter().enumerate() {
            let _ = writeln!(
                svg,
                r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="{color}"/>"#,
                x_at(i),
                y_at(v)
            );
        }

        // Legend in two columns at the top left of the plot
        let lx = x0 + 10.0 + (idx % 2) as f64 * 110.0;
        let ly = y0 + 10.0 + (idx / 2) as f64 * 16.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{lx:.1}" y="{:.1}" width="12" height="4" fill="{color}"/>"#,
            ly - 4.0
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{ly:.1}" font-size="11">{}</text>"#,
            lx + 16.0,
            escape_html(&s.label)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn gua_timeline(timeline: &Timeline, config: &RenderConfig) -> String {
    let series: Vec<Series<'_>> = gua_domain()
        .zip(&timeline.gua)
        .map(|(g, values)| Series {
            label: label_for(&config.gua_names, g),
            color: palette_color(&config.gua_palette, g as usize),
            values,
        })
        .collect();
    line_chart("Gua Timeline", &series, timeline.len(), config)
}

fn cpu_timeline(timeline: &Timeline, config: &RenderConfig) -> String {
    let series: Vec<Series<'_>> = timeline
        .cpu
        .iter()
        .enumerate()
        .map(|(i, (cpu, values))| Series {
            label: format!("CPU{}", cpu),
            color: CPU_SERIES_PALETTE[i % CPU_SERIES_PALETTE.len()].to_string(),
            values,
        })
        .collect();
    line_chart("CPU Timeline", &series, timeline.len(), config)
}
