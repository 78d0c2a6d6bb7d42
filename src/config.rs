//! Configuration for snapshot discovery and chart rendering
//!
//! Loaded from TOML; every field has a default so a partial file (or no file
//! at all) works. Rendering settings are passed explicitly to the output
//! modules and never read from global state.
//!
//! # Example
//!
//! ```
//! use guascope::config::GuascopeConfig;
//!
//! let config: GuascopeConfig = toml::from_str(r#"
//! [discovery]
//! dir = "/var/run/scx"
//!
//! [render]
//! width = 1200
//! "#).unwrap();
//!
//! assert_eq!(config.discovery.prefix, "task_ctx_");
//! assert_eq!(config.render.width, 1200);
//! ```

use crate::error::{Result, SnapshotError};
use crate::trigram::{ELEMENT_COUNT, ELEMENT_NAMES, GUA_COUNT, GUA_NAMES};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuascopeConfig {
    pub discovery: DiscoveryConfig,
    pub render: RenderConfig,
}

/// Where snapshot files are looked up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Directory scanned for snapshots
    pub dir: PathBuf,
    /// File name prefix of snapshot files
    pub prefix: String,
    /// File name suffix of snapshot files
    pub extension: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./scx"),
            prefix: "task_ctx_".to_string(),
            extension: ".json".to_string(),
        }
    }
}

impl DiscoveryConfig {
    /// Glob-like description used in messages, e.g. `./scx/task_ctx_*.json`
    pub fn pattern(&self) -> String {
        format!("{}/{}*{}", self.dir.display(), self.prefix, self.extension)
    }
}

/// Chart and report settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory receiving charts and reports
    pub output_dir: PathBuf,
    /// Display name per gua (8 entries)
    pub gua_names: Vec<String>,
    /// Display name per element (5 entries)
    pub element_names: Vec<String>,
    /// Bar/line colour per gua (8 entries)
    pub gua_palette: Vec<String>,
    /// Slice colour per element (5 entries)
    pub element_palette: Vec<String>,
    /// Bar colour of the CPU distribution chart
    pub cpu_color: String,
    /// Chart width in pixels
    pub width: u32,
    /// Chart height in pixels
    pub height: u32,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./scx"),
            gua_names: strings(&GUA_NAMES),
            element_names: strings(&ELEMENT_NAMES),
            gua_palette: strings(&[
                "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE",
                "#85C1E2",
            ]),
            element_palette: strings(&["#2ecc71", "#e74c3c", "#f39c12", "#9b59b6", "#1abc9c"]),
            cpu_color: "#3498db".to_string(),
            width: 1000,
            height: 500,
        }
    }
}

impl GuascopeConfig {
    /// Load configuration from a TOML file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|e| {
            SnapshotError::InvalidConfig(format!("cannot read {}: {}", path_ref.display(), e))
        })?;

        let config: GuascopeConfig = toml::from_str(&contents).map_err(|e| {
            SnapshotError::InvalidConfig(format!("cannot parse {}: {}", path_ref.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.discovery.prefix.is_empty() {
            return Err(SnapshotError::InvalidConfig(
                "discovery.prefix must not be empty".to_string(),
            ));
        }

        let render = &self.render;
        check_len("render.gua_names", render.gua_names.len(), GUA_COUNT)?;
        check_len("render.gua_palette", render.gua_palette.len(), GUA_COUNT)?;
        check_len("render.element_names", render.element_names.len(), ELEMENT_COUNT)?;
        check_len(
            "render.element_palette",
            render.element_palette.len(),
            ELEMENT_COUNT,
        )?;

        if render.width == 0 || render.height == 0 {
            return Err(SnapshotError::InvalidConfig(format!(
                "chart dimensions must be positive, got {}x{}",
                render.width, render.height
            )));
        }

        Ok(())
    }
}

fn check_len(field: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(SnapshotError::InvalidConfig(format!(
            "{} must have {} entries, got {}",
            field, expected, actual
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = GuascopeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.discovery.pattern(), "./scx/task_ctx_*.json");
        assert_eq!(config.render.gua_names[7], "QIAN");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: GuascopeConfig = toml::from_str(
            r##"
[render]
cpu_color = "#000000"
"##,
        )
        .unwrap();

        assert_eq!(config.render.cpu_color, "#000000");
        assert_eq!(config.render.width, 1000);
        assert_eq!(config.discovery, DiscoveryConfig::default());
    }

    #[test]
    fn test_wrong_palette_length_rejected() {
        let mut config = GuascopeConfig::default();
        config.render.gua_palette.pop();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("render.gua_palette"));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let mut config = GuascopeConfig::default();
        config.render.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guascope.toml");
        fs::write(
            &path,
            r#"
[discovery]
dir = "/data/snapshots"
prefix = "ctx_"
"#,
        )
        .unwrap();

        let config = GuascopeConfig::from_file(&path).unwrap();
        assert_eq!(config.discovery.dir, PathBuf::from("/data/snapshots"));
        assert_eq!(config.discovery.prefix, "ctx_");
        assert_eq!(config.discovery.extension, ".json");
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[discovery\n").unwrap();

        let err = GuascopeConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidConfig(_)));
    }
}
