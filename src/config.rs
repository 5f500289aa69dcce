//! Daemon configuration.
//!
//! The configuration is loaded from a JSON file.  Every key is optional, a
//! minimal `{}` file is valid, and unknown keys are ignored so the file can
//! grow new sections without breaking older daemons.
//!
//! # Example
//!
//! ```json
//! {
//!   "verbose": true,
//!   "socket_path": "/run/user/1000/launcher-statslog.sock",
//!   "output": "/var/log/launcher-stats.jsonl"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Render every event as a human-readable `info` log line.  Also raises
    /// the daemon's default log filter to `info` when `RUST_LOG` is unset.
    pub verbose: bool,
    /// Socket to accept requests on.  Defaults to
    /// `$XDG_RUNTIME_DIR/launcher-statslog.sock`.
    pub socket_path: Option<PathBuf>,
    /// File that rows are appended to.  Rows go to stdout when unset.
    pub output: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// `env_logger` filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "info"
        } else {
            "error"
        }
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "verbose": true,
            "socket_path": "/tmp/stats.sock",
            "output": "/tmp/stats.jsonl"
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert!(cfg.verbose);
        assert_eq!(cfg.socket_path, Some(PathBuf::from("/tmp/stats.sock")));
        assert_eq!(cfg.output, Some(PathBuf::from("/tmp/stats.jsonl")));
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert!(!cfg.verbose);
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "verbose": true, "future_section": { "key": 42 } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert!(cfg.verbose);
    }

    #[test]
    fn verbose_raises_default_filter_to_info() {
        let quiet = Config::default();
        assert_eq!(quiet.default_log_filter(), "error");
        let verbose = Config {
            verbose: true,
            ..Config::default()
        };
        assert_eq!(verbose.default_log_filter(), "info");
        let level: log::LevelFilter = verbose.default_log_filter().parse().unwrap();
        assert!(log::Level::Info <= level);
    }

    #[test]
    fn missing_file_is_error() {
        let path = std::env::temp_dir().join("statslog-no-such-config.json");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("config error: failed to read"));
    }
}
