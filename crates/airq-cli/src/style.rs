//! Visual styling utilities for the CLI.
//!
//! Colors follow the dashboard's AQI palette: green, yellow, orange, red,
//! purple and maroon from good to hazardous.

use airq_types::AqiLevel;
use owo_colors::OwoColorize;

/// RGB color for each AQI level.
pub fn level_rgb(level: AqiLevel) -> (u8, u8, u8) {
    match level {
        AqiLevel::Good => (0, 228, 0),
        AqiLevel::Moderate => (255, 255, 0),
        AqiLevel::UnhealthySensitive => (255, 126, 0),
        AqiLevel::Unhealthy => (255, 0, 0),
        AqiLevel::VeryUnhealthy => (143, 63, 151),
        AqiLevel::Hazardous => (126, 0, 35),
    }
}

/// Format an AQI value with the color of its level.
pub fn format_aqi_colored(aqi: Option<u16>, no_color: bool) -> String {
    let Some(aqi) = aqi else {
        return "--".to_string();
    };
    if no_color {
        return aqi.to_string();
    }

    let (r, g, b) = level_rgb(AqiLevel::from_aqi(aqi));
    format!("{}", aqi.truecolor(r, g, b).bold())
}

/// Format a level label with its color.
pub fn format_level(level: AqiLevel, no_color: bool) -> String {
    if no_color {
        return level.label().to_string();
    }

    let (r, g, b) = level_rgb(level);
    format!("{}", level.label().truecolor(r, g, b))
}

/// Format a success message.
pub fn format_success(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[OK] {}", message)
    } else {
        format!("{} {}", "[OK]".green(), message)
    }
}

/// Format a warning message.
pub fn format_warning(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[!!] {}", message)
    } else {
        format!("{} {}", "[!!]".yellow(), message)
    }
}

/// Format a title header.
pub fn format_title(title: &str, no_color: bool) -> String {
    let rule = "━".repeat(title.chars().count());
    if no_color {
        format!("{}\n{}", title, rule)
    } else {
        format!("{}\n{}", title.bold(), rule.dimmed())
    }
}
