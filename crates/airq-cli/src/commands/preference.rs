//! Preference command - key-value settings shared with the dashboard.

use airq_store::LocalStore;
use airq_types::{AqiThreshold, Theme, keys};
use anyhow::{Context, Result};
use serde_json::{Value, json};

use crate::cli::PreferenceAction;
use crate::format::{FormatOptions, format_preferences_text};
use crate::style;
use crate::util::{parse_value, write_output};

pub async fn cmd_preference(
    store: &LocalStore,
    action: PreferenceAction,
    opts: &FormatOptions,
) -> Result<()> {
    match action {
        PreferenceAction::Get { key } => {
            let value = store.get_preference::<Value>(&key).await?;
            let content = match (value, opts.json) {
                (value, true) => opts.as_json(&value)?,
                (Some(value), false) => format!("{}\n", value),
                (None, false) => format!("{} is not set\n", key),
            };
            write_output(None, &content)
        }
        PreferenceAction::Set { key, value } => {
            let value = validate(&key, parse_value(&value))?;
            store
                .set_preference(&key, &value)
                .await
                .with_context(|| format!("Failed to set {}", key))?;

            let content = if opts.json {
                opts.as_json(&json!({ "key": key, "value": value }))?
            } else {
                style::format_success(&format!("{} = {}", key, value), opts.no_color) + "\n"
            };
            write_output(None, &content)
        }
        PreferenceAction::List => {
            let prefs = store.list_preferences().await?;
            let content = if opts.json {
                opts.as_json(&prefs)?
            } else if prefs.is_empty() {
                "No preferences set\n".to_string()
            } else {
                format_preferences_text(&prefs)
            };
            write_output(None, &content)
        }
        PreferenceAction::Remove { key } => {
            let removed = store.remove_preference(&key).await?;
            let content = if opts.json {
                opts.as_json(&json!({ "key": key, "removed": removed }))?
            } else if removed {
                style::format_success(&format!("Removed {}", key), opts.no_color) + "\n"
            } else {
                format!("{} was not set\n", key)
            };
            write_output(None, &content)
        }
    }
}

/// Reject values for well-known keys that the dashboard could not read back.
fn validate(key: &str, value: Value) -> Result<Value> {
    match key {
        keys::AQI_THRESHOLD => {
            let threshold: AqiThreshold = serde_json::from_value(value)
                .with_context(|| format!("{} must be an integer from 0 to 500", key))?;
            Ok(json!(threshold))
        }
        keys::THEME => {
            let raw = value.as_str().unwrap_or_default();
            let theme: Theme = raw.parse()?;
            Ok(json!(theme))
        }
        keys::SELECTED_CITY if !value.is_string() => {
            Ok(Value::String(value.to_string()))
        }
        _ => Ok(value),
    }
}
