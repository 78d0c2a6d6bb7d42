//! Snapshot source discovery
//!
//! Expands `<dir>/<prefix>*<extension>` with [`glob`] and sorts the matches
//! by file name. Lexicographic order matches sampling order for fixed-width
//! timestamps, which is what the scheduler's dumper writes.

use crate::config::DiscoveryConfig;
use crate::error::{Result, SnapshotError};
use glob::{glob_with, MatchOptions, Pattern};
use std::path::PathBuf;

/// Glob expression for `config`, with the literal parts escaped
pub fn glob_pattern(config: &DiscoveryConfig) -> Result<String> {
    let dir = config.dir.to_str().ok_or_else(|| {
        SnapshotError::unreadable(&config.dir, "directory path is not valid UTF-8")
    })?;
    Ok(format!(
        "{}/{}*{}",
        Pattern::escape(dir.trim_end_matches('/')),
        Pattern::escape(&config.prefix),
        Pattern::escape(&config.extension)
    ))
}

/// Discover snapshot files; an empty result is not an error here
///
/// A missing directory yields no sources, like a glob with no matches.
pub fn discover(config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    if config.dir.exists() && !config.dir.is_dir() {
        return Err(SnapshotError::unreadable(&config.dir, "not a directory"));
    }

    let pattern = glob_pattern(config)?;
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let entries = glob_with(&pattern, options).map_err(|e| {
        SnapshotError::unreadable(&config.dir, format!("bad pattern {}: {}", pattern, e))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SnapshotError::unreadable(e.path(), e.error()))?;
        if path.is_file() {
            paths.push(path);
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    tracing::debug!(
        pattern = %pattern,
        found = paths.len(),
        "snapshot discovery finished"
    );

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> DiscoveryConfig {
        DiscoveryConfig {
            dir: dir.path().to_path_buf(),
            ..DiscoveryConfig::default()
        }
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_discover_sorted_matches_only() {
        let dir = TempDir::new().unwrap();
        for name in ["task_ctx_3.json", "task_ctx_1.json", "other.json", "task_ctx_2.txt"] {
            fs::write(dir.path().join(name), "[]").unwrap();
        }
        fs::create_dir(dir.path().join("task_ctx_dir.json")).unwrap();

        let paths = discover(&config_for(&dir)).unwrap();
        assert_eq!(names(&paths), vec!["task_ctx_1.json", "task_ctx_3.json"]);
    }

    #[test]
    fn test_pattern_metacharacters_are_literal() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("run[1]");
        fs::create_dir(&nested).unwrap();
        for name in ["ctx?_1.json", "ctxA_2.json"] {
            fs::write(nested.join(name), "[]").unwrap();
        }

        let config = DiscoveryConfig {
            dir: nested,
            prefix: "ctx?_".to_string(),
            ..DiscoveryConfig::default()
        };
        let paths = discover(&config).unwrap();
        assert_eq!(names(&paths), vec!["ctx?_1.json"]);
    }

    #[test]
    fn test_glob_pattern_shape() {
        let config = DiscoveryConfig::default();
        assert_eq!(glob_pattern(&config).unwrap(), "./scx/task_ctx_*.json");
    }

    #[test]
    fn test_discover_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(discover(&config_for(&dir)).unwrap().is_empty());
    }

    #[test]
    fn test_discover_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = DiscoveryConfig {
            dir: dir.path().join("nope"),
            ..DiscoveryConfig::default()
        };
        assert!(discover(&config).unwrap().is_empty());
    }

    #[test]
    fn test_discover_file_instead_of_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, "").unwrap();
        let config = DiscoveryConfig {
            dir: file,
            ..DiscoveryConfig::default()
        };
        assert!(matches!(
            discover(&config),
            Err(SnapshotError::SourceUnreadable { .. })
        ));
    }
}
