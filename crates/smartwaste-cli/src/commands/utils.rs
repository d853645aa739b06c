//! Utils - Common Utilities for CLI Commands
//!
//! Shared utility functions used across CLI commands.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use smartwaste_monitor::{HttpTrainingApi, MonitorConfig, SystemStatus, TrainingApi};

use crate::cli::ConnectionArgs;
use crate::error::{CliError, CliResult};

// =============================================================================
// Output Formatting
// =============================================================================

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an error line without aborting
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a header
pub fn print_header(title: &str) {
    println!();
    println!("{}", title.bold().underline());
    println!();
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// =============================================================================
// Progress Bars
// =============================================================================

/// Create a training progress bar measured in percent
pub fn training_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}

// =============================================================================
// Connection Setup
// =============================================================================

/// Resolve configuration: explicit file, else default location, then flags
pub fn resolve_config(args: &ConnectionArgs) -> CliResult<MonitorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let path = Path::new(path);
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            let mut config = MonitorConfig::load_from_path(path)?;
            config.apply_env_overrides();
            config
        }
        None => MonitorConfig::load()?,
    };

    if let Some(server) = &args.server {
        config.server.url = server.clone();
    }
    config.validate()?;

    tracing::debug!(server = %config.server.url, "Configuration resolved");
    Ok(config)
}

/// Build the HTTP client and make sure the service answers
pub async fn connect(config: &MonitorConfig) -> CliResult<Arc<HttpTrainingApi>> {
    let api = Arc::new(HttpTrainingApi::new(&config.server.url));
    if !api.is_available().await {
        return Err(CliError::Unreachable(api.server_url().to_string()));
    }
    Ok(api)
}

/// Fetch the system summary. Failures are logged and yield `None`.
pub async fn fetch_system_status(api: &dyn TrainingApi) -> Option<SystemStatus> {
    match api.system_status().await {
        Ok(envelope) => {
            if !envelope.success {
                tracing::warn!(
                    error = envelope.error.as_deref().unwrap_or_default(),
                    "System status lookup unsuccessful"
                );
            }
            envelope.into_system_status()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Error loading system status");
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_flag_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nurl = \"http://from-file:5000\"\n").unwrap();

        let args = ConnectionArgs {
            server: Some("http://from-flag:5000".to_string()),
            config: Some(path.to_string_lossy().into_owned()),
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.server.url, "http://from-flag:5000");
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let args = ConnectionArgs {
            server: None,
            config: Some("/definitely/not/here.toml".to_string()),
        };
        assert!(matches!(resolve_config(&args), Err(CliError::Config(_))));
    }
}
