//! Configuration file management.

use std::fs;
use std::path::PathBuf;

use airq_store::RetentionPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Database file, overriding the platform default
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// City used when a command omits one
    #[serde(default)]
    pub default_city: Option<String>,

    /// Upper bound on the number of favorite cities
    #[serde(default = "default_max_favorites")]
    pub max_favorites: usize,

    /// Retention windows used by `cleanup`
    #[serde(default)]
    pub retention: RetentionPolicy,
}

fn default_max_favorites() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            default_city: None,
            max_favorites: default_max_favorites(),
            retention: RetentionPolicy::default(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("airq")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        let path = Self::path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        warn!("Failed to parse config {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Failed to read config {}: {}", path.display(), e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Resolve the database file: flag or `AIRQ_DB`, then config, then the
/// platform default.
pub fn resolve_db_path(arg: Option<PathBuf>, config: &Config) -> PathBuf {
    arg.or_else(|| config.db_path.clone())
        .unwrap_or_else(airq_store::default_db_path)
}

/// Resolve the retention policy: explicit flags override config.
pub fn resolve_retention(
    reading_days: Option<u32>,
    history_days: Option<u32>,
    config: &Config,
) -> RetentionPolicy {
    RetentionPolicy {
        reading_days: reading_days.unwrap_or(config.retention.reading_days),
        history_days: history_days.unwrap_or(config.retention.history_days),
    }
}
