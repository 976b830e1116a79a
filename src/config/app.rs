//! Main application configuration
//!
//! This module defines the configuration structures for the `elo` tool,
//! including environment variable loading, TOML files and validation.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory under the data dir holding one log per competition
pub const MATCH_HISTORY_DIR: &str = "match_history";

/// File under the data dir holding the key-value state
pub const STATE_FILE: &str = "config";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub storage: StorageSettings,
    pub interaction: InteractionSettings,
}

/// Process-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where match logs and state live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Root directory for all persisted data
    pub data_dir: PathBuf,
}

/// Settings for the interactive parts of the tool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Create unseen players without asking
    pub auto_confirm_new_players: bool,
    /// Refresh interval of the live chart in milliseconds
    pub graph_interval_ms: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            auto_confirm_new_players: false,
            graph_interval_ms: 1000,
        }
    }
}

/// `$HOME/.elo`, or `.elo` in the working directory without a home
fn default_data_dir() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".elo"))
        .unwrap_or_else(|| PathBuf::from(".elo"))
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from a TOML file, then validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(data_dir) = lookup("ELO_HOME") {
            config.storage.data_dir = PathBuf::from(data_dir);
        }
        if let Some(log_level) = lookup("ELO_LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Some(auto_confirm) = lookup("ELO_AUTO_CONFIRM") {
            config.interaction.auto_confirm_new_players = auto_confirm
                .parse()
                .map_err(|_| anyhow!("Invalid ELO_AUTO_CONFIRM value: {}", auto_confirm))?;
        }
        if let Some(interval) = lookup("ELO_GRAPH_INTERVAL_MS") {
            config.interaction.graph_interval_ms = interval
                .parse()
                .map_err(|_| anyhow!("Invalid ELO_GRAPH_INTERVAL_MS value: {}", interval))?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Directory holding the per-competition match logs
    pub fn match_history_dir(&self) -> PathBuf {
        self.storage.data_dir.join(MATCH_HISTORY_DIR)
    }

    /// Path of the key-value state file
    pub fn state_file(&self) -> PathBuf {
        self.storage.data_dir.join(STATE_FILE)
    }

    /// Get the live chart refresh interval as Duration
    pub fn graph_interval(&self) -> Duration {
        Duration::from_millis(self.interaction.graph_interval_ms)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.storage.data_dir.as_os_str().is_empty() {
        return Err(anyhow!("Data directory cannot be empty"));
    }

    if config.interaction.graph_interval_ms == 0 {
        return Err(anyhow!("Graph interval must be greater than 0"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.service.log_level, "warn");
        assert_eq!(config.graph_interval(), Duration::from_secs(1));
        assert!(!config.interaction.auto_confirm_new_players);
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("ELO_HOME", "/tmp/elo-test"),
            ("ELO_LOG_LEVEL", "debug"),
            ("ELO_AUTO_CONFIRM", "true"),
            ("ELO_GRAPH_INTERVAL_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/elo-test"));
        assert_eq!(
            config.match_history_dir(),
            PathBuf::from("/tmp/elo-test/match_history")
        );
        assert_eq!(config.state_file(), PathBuf::from("/tmp/elo-test/config"));
        assert_eq!(config.service.log_level, "debug");
        assert!(config.interaction.auto_confirm_new_players);
        assert_eq!(config.graph_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_env_values() {
        assert!(AppConfig::from_lookup(lookup_from(&[("ELO_AUTO_CONFIRM", "maybe")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("ELO_GRAPH_INTERVAL_MS", "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("ELO_LOG_LEVEL", "loud")])).is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [storage]
            data_dir = "/srv/elo"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/elo"));
        assert_eq!(config.service.log_level, "warn");
        assert_eq!(config.interaction.graph_interval_ms, 1000);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("elo.toml");
        std::fs::write(
            &path,
            "[service]\nlog_level = \"info\"\n\n[interaction]\nauto_confirm_new_players = true\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.service.log_level, "info");
        assert!(config.interaction.auto_confirm_new_players);

        std::fs::write(&path, "[interaction]\ngraph_interval_ms = 0\n").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
        assert!(AppConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
