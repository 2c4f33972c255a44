//! Utility functions for CLI operations.

use std::io::{self, Write};
use std::path::Path;

use airq_store::LocalStore;
use anyhow::{Context, Result, bail};

use crate::config::Config;

/// Resolve the city for a command: explicit argument, then the config's
/// `default_city`, then the dashboard's `selectedCity` preference.
pub async fn resolve_city(city: Option<String>, config: &Config, store: &LocalStore) -> Result<String> {
    if let Some(city) = city.or_else(|| config.default_city.clone()) {
        return Ok(city);
    }

    match store.selected_city().await? {
        Some(city) => Ok(city),
        None => bail!(
            "No city specified. Pass a city, set default_city in {}, or run 'airq pref set selectedCity <CITY>'",
            Config::path().display()
        ),
    }
}

/// Open the store, attaching the location to any failure.
pub async fn open_store(store: &LocalStore) -> Result<&LocalStore> {
    store
        .open()
        .await
        .with_context(|| format!("Failed to open database at {}", store.location()))?;
    Ok(store)
}

/// Interpret a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

/// Write output to file or stdout
pub fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}
