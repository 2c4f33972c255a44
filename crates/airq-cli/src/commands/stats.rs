//! Stats command implementation.

use std::fmt::Write as _;

use airq_store::{LocalStore, SCHEMA_VERSION, StoreLocation};
use anyhow::Result;
use serde::Serialize;

use crate::format::FormatOptions;
use crate::style;
use crate::util::write_output;

#[derive(Debug, Serialize)]
struct Stats {
    location: String,
    size_bytes: Option<u64>,
    schema_version: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    readings: u64,
    historical: u64,
    favorites: usize,
    preferences: usize,
}

pub async fn cmd_stats(store: &LocalStore, city: Option<String>, opts: &FormatOptions) -> Result<()> {
    let size_bytes = match store.location() {
        StoreLocation::File(path) => std::fs::metadata(path).ok().map(|m| m.len()),
        StoreLocation::InMemory => None,
    };

    let stats = Stats {
        location: store.location().to_string(),
        size_bytes,
        schema_version: SCHEMA_VERSION,
        readings: store.count_readings(city.as_deref()).await?,
        historical: store.count_historical(city.as_deref()).await?,
        favorites: store.list_favorites().await?.len(),
        preferences: store.list_preferences().await?.len(),
        city,
    };

    let content = if opts.json {
        opts.as_json(&stats)?
    } else {
        format_stats_text(&stats, opts)
    };

    write_output(None, &content)
}

fn format_stats_text(stats: &Stats, opts: &FormatOptions) -> String {
    let mut out = style::format_title("Local Store", opts.no_color);
    out.push('\n');
    let _ = writeln!(out, "Database:     {}", stats.location);
    if let Some(size) = stats.size_bytes {
        let _ = writeln!(out, "Size:         {}", format_size(size));
    }
    let _ = writeln!(out, "Schema:       v{}", stats.schema_version);
    if let Some(city) = &stats.city {
        let _ = writeln!(out, "City:         {}", city);
    }
    let _ = writeln!(out, "Readings:     {}", stats.readings);
    let _ = writeln!(out, "Historical:   {}", stats.historical);
    let _ = writeln!(out, "Favorites:    {}", stats.favorites);
    let _ = writeln!(out, "Preferences:  {}", stats.preferences);
    out
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
