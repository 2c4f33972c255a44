//! History command - daily aggregates per city.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use airq_store::{HistoricalQuery, LocalStore};
use anyhow::{Context, Result};
use serde_json::json;
use time::Date;

use crate::cli::HistoryAction;
use crate::config::Config;
use crate::format::{FormatOptions, format_history_text};
use crate::style;
use crate::util::{resolve_city, write_output};

pub async fn cmd_history(
    store: &LocalStore,
    action: HistoryAction,
    config: &Config,
    opts: &FormatOptions,
) -> Result<()> {
    match action {
        HistoryAction::Save {
            city,
            date,
            payload,
        } => {
            let id = store
                .save_historical(&city, date, &payload)
                .await
                .with_context(|| format!("Failed to save history for {} on {}", city, date))?;

            let content = if opts.json {
                opts.as_json(&json!({ "id": id }))?
            } else {
                style::format_success(&format!("Saved {}", id), opts.no_color) + "\n"
            };
            write_output(None, &content)
        }
        HistoryAction::List { city, from, to } => {
            let city = resolve_city(city, config, store).await?;
            list_history(store, &city, from, to, opts).await
        }
        HistoryAction::Export {
            city,
            from,
            to,
            output,
        } => export_history(store, city, from, to, output, opts).await,
    }
}

fn build_query(city: Option<&str>, from: Option<Date>, to: Option<Date>) -> HistoricalQuery {
    let mut query = HistoricalQuery::new();
    if let Some(city) = city {
        query = query.city(city);
    }
    if let Some(from) = from {
        query = query.from(from);
    }
    if let Some(to) = to {
        query = query.to(to);
    }
    query
}

async fn list_history(
    store: &LocalStore,
    city: &str,
    from: Option<Date>,
    to: Option<Date>,
    opts: &FormatOptions,
) -> Result<()> {
    let records = match (from, to) {
        (Some(from), Some(to)) => store.get_historical(city, from, to).await?,
        _ => {
            store
                .query_historical(&build_query(Some(city), from, to))
                .await?
        }
    };

    let content = if opts.json {
        opts.as_json(&records)?
    } else if records.is_empty() {
        format!("No history records found for {}\n", city)
    } else {
        format_history_text(&records, opts)
    };

    write_output(None, &content)
}

async fn export_history(
    store: &LocalStore,
    city: Option<String>,
    from: Option<Date>,
    to: Option<Date>,
    output: Option<PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let query = build_query(city.as_deref(), from, to);

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create file: {}", path.display()))?;
            let count = store
                .export_historical_csv(&query, BufWriter::new(file))
                .await?;
            eprintln!(
                "{}",
                style::format_success(
                    &format!("Exported {} records to {}", count, path.display()),
                    opts.no_color
                )
            );
        }
        None => {
            store
                .export_historical_csv(&query, std::io::stdout())
                .await?;
        }
    }

    Ok(())
}
