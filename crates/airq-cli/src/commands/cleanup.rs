//! Cleanup command - apply the retention windows.

use airq_store::LocalStore;
use anyhow::{Context, Result};
use tracing::info;

use crate::config::{Config, resolve_retention};
use crate::format::{FormatOptions, format_cleanup_text};
use crate::util::write_output;

pub async fn cmd_cleanup(
    store: &LocalStore,
    reading_days: Option<u32>,
    history_days: Option<u32>,
    config: &Config,
    opts: &FormatOptions,
) -> Result<()> {
    let policy = resolve_retention(reading_days, history_days, config);
    info!(
        "Keeping {} days of readings and {} days of history",
        policy.reading_days, policy.history_days
    );

    let report = store
        .cleanup(policy)
        .await
        .context("Retention cleanup failed")?;

    let content = if opts.json {
        opts.as_json(&report)?
    } else {
        format_cleanup_text(&report, opts)
    };

    write_output(None, &content)
}
