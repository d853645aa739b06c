//! Configuration for the SmartWaste training monitor
//!
//! Loaded from `~/.smartwaste/config.toml` when present. Every field has a
//! default, and `SMARTWASTE_SERVER_URL` overrides the server address.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::api::DEFAULT_SERVER_URL;
use crate::types::TrainingRequest;

/// Environment variable overriding `server.url`
pub const SERVER_URL_ENV: &str = "SMARTWASTE_SERVER_URL";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Config could not be serialized
    #[error("Failed to write config: {0}")]
    WriteError(#[from] toml::ser::Error),
    /// A value failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level monitor configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// `[server]` section
    #[serde(default)]
    pub server: ServerConfig,
    /// `[monitor]` section
    #[serde(default)]
    pub monitor: PollingConfig,
    /// `[training]` section
    #[serde(default)]
    pub training: TrainingDefaults,
}

/// Training service location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Base URL of the training service
    #[serde(default = "default_server_url")]
    pub url: String,
}

/// Polling behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollingConfig {
    /// Period between status polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Hyper-parameters used when the command line does not set them
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingDefaults {
    /// Number of epochs
    #[serde(default = "default_epochs")]
    pub epochs: u32,
    /// Optimizer learning rate
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Images per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

// Default value functions
fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}
fn default_poll_interval_ms() -> u64 {
    2000
}
fn default_epochs() -> u32 {
    20
}
fn default_learning_rate() -> f64 {
    0.001
}
fn default_batch_size() -> u32 {
    32
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for TrainingDefaults {
    fn default() -> Self {
        Self {
            epochs: default_epochs(),
            learning_rate: default_learning_rate(),
            batch_size: default_batch_size(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from the default location, falling back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: MonitorConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty TOML
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Default configuration file path
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".smartwaste")
            .join("config.toml")
    }

    /// Apply `SMARTWASTE_SERVER_URL` if set
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                self.server.url = url.trim().to_string();
            }
        }
    }

    /// Reject values the monitor cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.url.trim().is_empty() {
            return Err(ConfigError::Invalid("server.url must not be empty".to_string()));
        }
        if self.monitor.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "monitor.poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Poll period
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.monitor.poll_interval_ms)
    }

    /// Training request built from the configured defaults
    pub fn training_request(&self) -> TrainingRequest {
        TrainingRequest::new(
            self.training.epochs,
            self.training.learning_rate,
            self.training.batch_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.server.url, "http://localhost:5000");
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.training_request(), TrainingRequest::new(20, 0.001, 32));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nurl = \"http://waste.local:8080\"\n\n[training]\nepochs = 50\n",
        )
        .unwrap();

        let config = MonitorConfig::load_from_path(&path).unwrap();
        assert_eq!(config.server.url, "http://waste.local:8080");
        assert_eq!(config.training.epochs, 50);
        assert_eq!(config.training.batch_size, 32);
        assert_eq!(config.monitor.poll_interval_ms, 2000);
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[monitor]\npoll_interval_ms = 0\n").unwrap();

        let err = MonitorConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = MonitorConfig::default();
        config.training.learning_rate = 0.0005;
        config.save(&path).unwrap();

        let loaded = MonitorConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.training.learning_rate, 0.0005);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nurl = 1").unwrap();
        assert!(matches!(
            MonitorConfig::load_from_path(&path),
            Err(ConfigError::ParseError(_))
        ));
    }
}
