//! CLI argument parsing for Guascope

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary on stdout
    Text,
    /// JSON on stdout
    Json,
    /// CSV tables on stdout
    Csv,
    /// SVG charts written to the output directory (default)
    Svg,
    /// Single-page HTML report written to the output directory
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "guascope")]
#[command(version)]
#[command(about = "Aggregate and chart scheduler task snapshots", long_about = None)]
pub struct Cli {
    /// Directory containing snapshot files (default: ./scx)
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Snapshot file name prefix (default: task_ctx_)
    #[arg(long = "prefix", value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Snapshot file name suffix (default: .json)
    #[arg(long = "extension", value_name = "EXT")]
    pub extension: Option<String>,

    /// Directory receiving charts and reports (default: ./scx)
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "svg")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
