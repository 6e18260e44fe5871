use crate::engine::AdvancePolicy;
use crate::error::{HistoryError, HistoryResult};
use crate::history::CategoryFilter;
use crate::utils::file::write_atomic;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_history_size", alias = "history_size")]
    pub history_size: usize,

    #[serde(default = "default_show_timestamps", alias = "show_timestamps")]
    pub show_timestamps: bool,

    #[serde(default, alias = "filter_type")]
    pub filter_type: CategoryFilter,

    #[serde(default)]
    pub advance_policy: AdvancePolicy,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub ignore_own_pastes: bool,

    #[serde(default = "default_theme")]
    pub theme: String,
}

/// Shorter intervals turn the monitor into a busy loop.
pub const MIN_POLL_INTERVAL_MS: u64 = 50;

fn default_history_size() -> usize {
    10
}

fn default_show_timestamps() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_theme() -> String {
    "default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_size: default_history_size(),
            show_timestamps: default_show_timestamps(),
            filter_type: CategoryFilter::default(),
            advance_policy: AdvancePolicy::default(),
            poll_interval_ms: default_poll_interval_ms(),
            ignore_own_pastes: false,
            theme: default_theme(),
        }
    }
}

impl Config {
    /// Load the config, writing defaults when no file exists yet. Unreadable or
    /// invalid files fall back to defaults without being overwritten.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let config = Config::default();
                match config.save(path) {
                    Ok(()) => info!(path = %path.display(), "Created default config"),
                    Err(e) => warn!(error = %e, "Could not write default config"),
                }
                return config;
            }
            Err(source) => {
                let e = HistoryError::StorageRead {
                    path: path.to_path_buf(),
                    source,
                };
                warn!(error = %e, "Using default config");
                return Config::default();
            }
        };

        Self::parse(&content).unwrap_or_else(|e| {
            warn!(error = %e, code = e.code(), "Invalid config, using defaults");
            Config::default()
        })
    }

    pub fn parse(content: &str) -> HistoryResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HistoryResult<()> {
        if self.history_size == 0 {
            return Err(HistoryError::InvalidSetting(
                "historySize must be at least 1".to_string(),
            ));
        }
        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(HistoryError::InvalidSetting(format!(
                "pollIntervalMs must be at least {MIN_POLL_INTERVAL_MS}"
            )));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> HistoryResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        write_atomic(path, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Category;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.history_size, 10);
        assert!(config.show_timestamps);
        assert_eq!(config.filter_type, CategoryFilter::All);
        assert_eq!(config.advance_policy, AdvancePolicy::Stay);
    }

    #[test]
    fn test_config_serialization() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(json["historySize"], 10);
        assert_eq!(json["showTimestamps"], true);
        assert_eq!(json["filterType"], "All");
    }

    #[test]
    fn test_config_deserialization_fills_defaults() {
        let config = Config::parse(r#"{"historySize": 3, "filterType": "URL"}"#).unwrap();
        assert_eq!(config.history_size, 3);
        assert_eq!(config.filter_type, CategoryFilter::Only(Category::Url));
        assert!(config.show_timestamps);
        assert_eq!(config.poll_interval_ms, 500);
    }

    #[test]
    fn test_legacy_snake_case_keys() {
        let raw = r#"{"history_size": 25, "show_timestamps": false, "filter_type": "All"}"#;
        let config = Config::parse(raw).unwrap();
        assert_eq!(config.history_size, 25);
        assert!(!config.show_timestamps);
    }

    #[test]
    fn test_zero_history_size_rejected() {
        let err = Config::parse(r#"{"historySize": 0}"#).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidSetting(_)));
    }

    #[test]
    fn test_poll_interval_has_floor() {
        let err = Config::parse(r#"{"pollIntervalMs": 0}"#).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidSetting(_)));
        assert!(Config::parse(r#"{"pollIntervalMs": 49}"#).is_err());
        assert_eq!(Config::parse(r#"{"pollIntervalMs": 50}"#).unwrap().poll_interval_ms, 50);
    }

    #[test]
    fn test_load_zero_poll_interval_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"historySize": 4, "pollIntervalMs": 0}"#).unwrap();

        assert_eq!(Config::load(&path).poll_interval_ms, 500);
    }

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let config = Config::load(&path);
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_corrupt_falls_back_without_overwriting() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "historySize = 3").unwrap();

        assert_eq!(Config::load(&path), Config::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "historySize = 3");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        let config = Config {
            history_size: 42,
            advance_policy: AdvancePolicy::Down,
            ..Config::default()
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path), config);
    }
}
