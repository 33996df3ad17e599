//! Configuration for the logging subsystem
//!
//! A small TOML file, typically `diaglog.toml` next to the host's other
//! settings. Every field has a default so a missing file is not an error.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::Result;
use crate::types::RunMode;

fn default_max_archives() -> usize {
    constants::MAX_ARCHIVES
}

fn default_mode() -> RunMode {
    RunMode::Interactive
}

/// Logging subsystem configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log directory override; defaults to `~/.diaglog/logs`
    pub dir: Option<PathBuf>,
    /// Archives kept after a pruning pass
    #[serde(default = "default_max_archives")]
    pub max_archives: usize,
    /// Capture first-chance faults. Off by default; the fault stream of a
    /// fully modded host is only useful to people debugging it.
    #[serde(default)]
    pub first_chance: bool,
    /// Originating modules whose faults are never reported
    #[serde(default)]
    pub ignore_sources: Vec<String>,
    /// Substrings that drop a fault when found in its rendered trace
    #[serde(default)]
    pub ignore_contents: Vec<String>,
    /// Host run mode, decides whether transient user notices are shown
    #[serde(default = "default_mode")]
    pub mode: RunMode,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: None,
            max_archives: default_max_archives(),
            first_chance: false,
            ignore_sources: Vec::new(),
            ignore_contents: Vec::new(),
            mode: default_mode(),
        }
    }
}

impl LogConfig {
    /// Load config from a TOML file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse TOML config content
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: LogConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Effective log directory
    pub fn log_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(constants::log_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.max_archives, 20);
        assert!(!config.first_chance);
        assert_eq!(config.mode, RunMode::Interactive);
        assert!(config.ignore_sources.is_empty());
    }

    #[test]
    fn test_parse_toml() {
        let content = r#"
dir = "/tmp/diag-logs"
max_archives = 5
first_chance = true
ignore_sources = ["Mp3Decoder"]
ignore_contents = ["TcpSocket::async_send"]
mode = "headless"
"#;
        let config = LogConfig::from_toml(content).unwrap();
        assert_eq!(config.dir, Some(PathBuf::from("/tmp/diag-logs")));
        assert_eq!(config.max_archives, 5);
        assert!(config.first_chance);
        assert_eq!(config.ignore_sources, vec!["Mp3Decoder"]);
        assert_eq!(config.mode, RunMode::Headless);
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/diag-logs"));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let config = LogConfig::load(Path::new("/nonexistent/diaglog.toml")).unwrap();
        assert_eq!(config.max_archives, 20);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(b"max_archives = 3\n").unwrap();

        let config = LogConfig::load(file.path()).unwrap();
        assert_eq!(config.max_archives, 3);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(LogConfig::from_toml("max_archives = \"many\"").is_err());
    }
}
