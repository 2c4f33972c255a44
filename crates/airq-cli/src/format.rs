//! Output formatting for text and JSON output.

use std::fmt::Write as _;

use airq_store::{CleanupReport, Favorite, Preference, StoredHistoricalRecord, StoredReading};
use airq_types::{AqiReading, DailyAqi};
use anyhow::Result;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Emit JSON instead of text.
    pub json: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool, json: bool) -> Self {
        Self { no_color, json }
    }

    /// Serialize value to a pretty JSON string.
    pub fn as_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)? + "\n")
    }
}

fn timestamp(time: OffsetDateTime) -> String {
    time.format(&Rfc3339).unwrap_or_else(|_| time.to_string())
}

/// Format one stored reading as a detail block.
#[must_use]
pub fn format_reading_text(reading: &StoredReading, opts: &FormatOptions) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{}",
        style::format_title(&reading.city, opts.no_color)
    );
    let _ = writeln!(output, "Captured:    {}", timestamp(reading.captured_at));

    // Payloads are opaque; show structured fields only when they parse
    let Ok(aqi) = reading.payload_as::<AqiReading>() else {
        let _ = writeln!(output, "Payload:     {}", reading.payload);
        return output;
    };

    let _ = writeln!(
        output,
        "AQI:         {}",
        style::format_aqi_colored(aqi.aqi, opts.no_color)
    );
    if let Some(level) = aqi.level() {
        let _ = writeln!(
            output,
            "Level:       {}",
            style::format_level(level, opts.no_color)
        );
        for advice in level.recommendations() {
            let _ = writeln!(output, "  - {}", advice);
        }
    }
    if let Some(ref dominant) = aqi.dominant_pollutant {
        let _ = writeln!(output, "Dominant:    {}", dominant);
    }
    if !aqi.time.is_empty() {
        let _ = writeln!(output, "Observed:    {}", aqi.time);
    }

    let pollutants: Vec<_> = aqi.pollutants.iter().collect();
    if !pollutants.is_empty() {
        let _ = writeln!(output, "Pollutants:");
        for (name, value) in pollutants {
            let _ = writeln!(output, "  {:<6} {:>7.1}", name, value);
        }
    }

    let weather = aqi.weather;
    if let Some(t) = weather.temperature {
        let _ = writeln!(output, "Temperature: {:.1} C", t);
    }
    if let Some(h) = weather.humidity {
        let _ = writeln!(output, "Humidity:    {:.0}%", h);
    }
    if let Some(p) = weather.pressure {
        let _ = writeln!(output, "Pressure:    {:.0} hPa", p);
    }
    if let Some(w) = weather.wind_speed {
        let _ = writeln!(output, "Wind:        {:.1} m/s", w);
    }

    output
}

/// Format readings as a table, one row per reading.
#[must_use]
pub fn format_readings_text(readings: &[StoredReading], opts: &FormatOptions) -> String {
    let mut output = format!("{:<26} {:>5}  {}\n", "CAPTURED", "AQI", "LEVEL");
    for reading in readings {
        let parsed = reading.payload_as::<AqiReading>().ok();
        let aqi = parsed.as_ref().and_then(|r| r.aqi);
        let level = parsed
            .as_ref()
            .and_then(|r| r.level())
            .map(|l| style::format_level(l, opts.no_color))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            output,
            "{:<26} {:>5}  {}",
            timestamp(reading.captured_at),
            style::format_aqi_colored(aqi, true),
            level
        );
    }
    output
}

/// Format daily records as a table, oldest first.
#[must_use]
pub fn format_history_text(records: &[StoredHistoricalRecord], opts: &FormatOptions) -> String {
    let mut output = format!(
        "{:<12} {:<14} {:>7} {:>5} {:>5}  {}\n",
        "DATE", "CITY", "AVG", "MIN", "MAX", "PEAK"
    );
    for record in records {
        let date = record.date.to_string();
        match record.payload_as::<DailyAqi>() {
            Ok(daily) => {
                let _ = writeln!(
                    output,
                    "{:<12} {:<14} {:>7.1} {:>5} {:>5}  {}",
                    date,
                    record.city,
                    daily.aqi_avg,
                    daily.aqi_min,
                    daily.aqi_max,
                    style::format_level(daily.peak_level(), opts.no_color)
                );
            }
            Err(_) => {
                let _ = writeln!(output, "{:<12} {:<14} {}", date, record.city, record.payload);
            }
        }
    }
    output
}

#[must_use]
pub fn format_favorites_text(favorites: &[Favorite]) -> String {
    let mut output = String::new();
    for favorite in favorites {
        let _ = writeln!(
            output,
            "{:<20} added {}",
            favorite.city,
            timestamp(favorite.added_at)
        );
    }
    output
}

#[must_use]
pub fn format_preferences_text(preferences: &[Preference]) -> String {
    let mut output = String::new();
    for pref in preferences {
        let _ = writeln!(output, "{} = {}", pref.key, pref.value);
    }
    output
}

#[must_use]
pub fn format_cleanup_text(report: &CleanupReport, opts: &FormatOptions) -> String {
    style::format_success(
        &format!(
            "Removed {} readings and {} historical records",
            report.readings_deleted, report.historical_deleted
        ),
        opts.no_color,
    ) + "\n"
}
