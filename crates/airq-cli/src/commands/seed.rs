//! Seed command - fill the store with sample data.

use airq_store::LocalStore;
use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::demo::{sample_daily, sample_reading};
use crate::format::FormatOptions;
use crate::style;
use crate::util::write_output;

pub async fn cmd_seed(store: &LocalStore, city: &str, days: u32, opts: &FormatOptions) -> Result<()> {
    let now = OffsetDateTime::now_utc();
    let today = now.date();

    // The thread-local rng is not Send, so seed a StdRng that can live
    // across the awaits below.
    let mut rng = StdRng::from_rng(&mut rand::rng());

    let reading = sample_reading(&mut rng, city, now);
    let id = store
        .save_reading(city, &reading)
        .await
        .context("Failed to save sample reading")?;
    debug!("Seeded reading {}", id);

    let mut saved = 0usize;
    for days_ago in 0..days {
        let Some(date) = today.checked_sub(Duration::days(i64::from(days_ago))) else {
            break;
        };
        let record = sample_daily(&mut rng, days_ago);
        store
            .save_historical(city, date, &record)
            .await
            .with_context(|| format!("Failed to save sample history for {}", date))?;
        saved += 1;
    }

    let content = if opts.json {
        opts.as_json(&json!({
            "city": city,
            "reading": id,
            "historical": saved,
        }))?
    } else {
        style::format_success(
            &format!("Seeded {} with 1 reading and {} daily records", city, saved),
            opts.no_color,
        ) + "\n"
    };

    write_output(None, &content)
}
