//! Threshold and theme commands.

use airq_store::LocalStore;
use airq_types::{AqiThreshold, Theme, keys};
use anyhow::Result;
use serde_json::json;

use crate::format::FormatOptions;
use crate::style;
use crate::util::write_output;

pub async fn cmd_threshold(
    store: &LocalStore,
    value: Option<AqiThreshold>,
    opts: &FormatOptions,
) -> Result<()> {
    let threshold = match value {
        Some(threshold) => {
            store.set_aqi_threshold(threshold).await?;
            threshold
        }
        None => store.aqi_threshold().await?,
    };

    let content = if opts.json {
        opts.as_json(&json!({ keys::AQI_THRESHOLD: threshold }))?
    } else if value.is_some() {
        style::format_success(
            &format!("Alert threshold set to {}", threshold),
            opts.no_color,
        ) + "\n"
    } else {
        format!("Alert threshold: {}\n", threshold)
    };

    write_output(None, &content)
}

pub async fn cmd_theme(
    store: &LocalStore,
    theme: Option<Theme>,
    toggle: bool,
    opts: &FormatOptions,
) -> Result<()> {
    let new_theme = match (theme, toggle) {
        (Some(theme), _) => Some(theme),
        (None, true) => Some(store.theme().await?.toggled()),
        (None, false) => None,
    };

    let current = match new_theme {
        Some(theme) => {
            store.set_theme(theme).await?;
            theme
        }
        None => store.theme().await?,
    };

    let content = if opts.json {
        opts.as_json(&json!({ keys::THEME: current }))?
    } else if new_theme.is_some() {
        style::format_success(&format!("Theme set to {}", current), opts.no_color) + "\n"
    } else {
        format!("Theme: {}\n", current)
    };

    write_output(None, &content)
}
