//! Reading command - save and inspect current readings.

use airq_store::LocalStore;
use airq_types::{AqiReading, Pollutants, Weather};
use anyhow::{Context, Result};
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::cli::ReadingAction;
use crate::config::Config;
use crate::format::{FormatOptions, format_reading_text, format_readings_text};
use crate::style;
use crate::util::{resolve_city, write_output};

pub async fn cmd_reading(
    store: &LocalStore,
    action: ReadingAction,
    config: &Config,
    opts: &FormatOptions,
) -> Result<()> {
    match action {
        ReadingAction::Save { city, aqi, payload } => {
            let city = resolve_city(city, config, store).await?;
            save_reading(store, &city, aqi, payload, opts).await
        }
        ReadingAction::List { city, limit } => {
            let city = resolve_city(city, config, store).await?;
            list_readings(store, &city, limit, opts).await
        }
        ReadingAction::Latest { city } => {
            let city = resolve_city(city, config, store).await?;
            latest_reading(store, &city, opts).await
        }
    }
}

async fn save_reading(
    store: &LocalStore,
    city: &str,
    aqi: Option<u16>,
    payload: Option<serde_json::Value>,
    opts: &FormatOptions,
) -> Result<()> {
    // Structured payloads are cleaned of sensor-error values before saving;
    // anything else is stored as given.
    let (id, reading) = match payload {
        Some(value) => match serde_json::from_value::<AqiReading>(value.clone()) {
            Ok(reading) => {
                let reading = reading.sanitized();
                (store.save_reading(city, &reading).await, Some(reading))
            }
            Err(_) => (store.save_reading(city, &value).await, None),
        },
        None => {
            let reading = AqiReading {
                aqi,
                city: city.to_string(),
                time: OffsetDateTime::now_utc().format(&Rfc3339)?,
                pollutants: Pollutants::default(),
                weather: Weather::default(),
                dominant_pollutant: None,
            };
            (store.save_reading(city, &reading).await, Some(reading))
        }
    };
    let id = id.with_context(|| format!("Failed to save reading for {}", city))?;

    let threshold = store.aqi_threshold().await?;
    let alert = reading.as_ref().is_some_and(|r| r.exceeds(threshold));

    let content = if opts.json {
        opts.as_json(&json!({ "id": id, "alert": alert }))?
    } else {
        let mut content = style::format_success(&format!("Saved reading {}", id), opts.no_color);
        content.push('\n');
        if let Some(aqi) = reading.and_then(|r| r.aqi).filter(|_| alert) {
            content.push_str(&style::format_warning(
                &format!(
                    "AQI {} in {} is above the alert threshold of {}",
                    aqi, city, threshold
                ),
                opts.no_color,
            ));
            content.push('\n');
        }
        content
    };

    write_output(None, &content)
}

async fn list_readings(
    store: &LocalStore,
    city: &str,
    limit: u32,
    opts: &FormatOptions,
) -> Result<()> {
    let readings = store.get_readings(city, Some(limit)).await?;

    let content = if opts.json {
        opts.as_json(&readings)?
    } else if readings.is_empty() {
        format!("No readings stored for {}\n", city)
    } else {
        format_readings_text(&readings, opts)
    };

    write_output(None, &content)
}

async fn latest_reading(store: &LocalStore, city: &str, opts: &FormatOptions) -> Result<()> {
    let reading = store.get_latest_reading(city).await?;

    let content = match (reading, opts.json) {
        (reading, true) => opts.as_json(&reading)?,
        (Some(reading), false) => format_reading_text(&reading, opts),
        (None, false) => format!("No readings stored for {}\n", city),
    };

    write_output(None, &content)
}
