//! Guascope - snapshot aggregation for trigram-classified scheduler tasks
//!
//! This library ingests periodic JSON snapshots of tasks managed by a
//! sched_ext scheduler (each tagged with a gua, an assigned CPU, and an
//! element), computes per-snapshot distributions, reconstructs their time
//! series across snapshots, and renders charts and reports.
//!
//! Pipeline: [`discovery`] -> [`loader`] -> [`normalize`] -> [`aggregate`]
//! -> [`timeline`], driven by [`analysis`], rendered by the `*_output`
//! modules.

pub mod aggregate;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod discovery;
pub mod error;
pub mod html_output;
pub mod json_output;
pub mod loader;
pub mod normalize;
pub mod ordering;
pub mod svg_output;
pub mod text_output;
pub mod timeline;
pub mod trigram;

pub use analysis::{analyze, Analysis};
pub use error::SnapshotError;
