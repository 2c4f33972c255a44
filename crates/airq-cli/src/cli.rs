//! CLI argument definitions using clap.

use std::path::PathBuf;

use airq_types::{AqiThreshold, Theme};
use clap::{Parser, Subcommand};
use time::Date;

/// Upper bound for `seed --days` (ten years of daily records).
pub const MAX_SEED_DAYS: i64 = 3650;

#[derive(Parser)]
#[command(name = "airq")]
#[command(author, version, about = "Local store for the air-quality dashboard", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Database file (defaults to the config's db_path, then the platform data directory)
    #[arg(long, global = true, env = "AIRQ_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save and inspect current readings
    Reading {
        #[command(subcommand)]
        action: ReadingAction,
    },

    /// Save, list and export daily historical records
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Manage stored preferences
    #[command(alias = "pref")]
    Preference {
        #[command(subcommand)]
        action: PreferenceAction,
    },

    /// Manage favorite cities
    #[command(alias = "fav")]
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },

    /// Show or set the AQI alert threshold (0-500)
    Threshold {
        /// New threshold
        #[arg(value_parser = parse_threshold)]
        value: Option<AqiThreshold>,
    },

    /// Show or set the theme
    Theme {
        /// New theme (dark or light)
        #[arg(value_parser = parse_theme, conflicts_with = "toggle")]
        theme: Option<Theme>,

        /// Switch to the other theme
        #[arg(long)]
        toggle: bool,
    },

    /// Delete readings and historical records past their retention window
    Cleanup {
        /// Keep readings captured within this many days
        #[arg(long)]
        reading_days: Option<u32>,

        /// Keep historical records dated within this many days
        #[arg(long)]
        history_days: Option<u32>,
    },

    /// Fill the store with generated sample data for a city
    Seed {
        /// City name
        city: String,

        /// Number of daily historical records to generate
        #[arg(
            short,
            long,
            default_value = "7",
            value_parser = clap::value_parser!(u32).range(1..=MAX_SEED_DAYS)
        )]
        days: u32,
    },

    /// Show record counts
    Stats {
        /// Restrict counts to one city
        city: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ReadingAction {
    /// Save a reading for a city
    Save {
        /// City name (defaults to the configured or selected city)
        city: Option<String>,

        /// AQI value for a minimal reading
        #[arg(long, required_unless_present = "payload")]
        aqi: Option<u16>,

        /// Full reading payload as JSON
        #[arg(long, value_parser = parse_json, conflicts_with = "aqi")]
        payload: Option<serde_json::Value>,
    },

    /// List the most recent readings for a city, newest first
    List {
        /// City name (defaults to the configured or selected city)
        city: Option<String>,

        /// Maximum number of readings
        #[arg(short = 'n', long, default_value = "50")]
        limit: u32,
    },

    /// Show the latest reading for a city
    Latest {
        /// City name (defaults to the configured or selected city)
        city: Option<String>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum HistoryAction {
    /// Save (or replace) the daily record for a city and date
    Save {
        /// City name
        city: String,

        /// Date (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        date: Date,

        /// Daily aggregate as JSON
        #[arg(long, value_parser = parse_json)]
        payload: serde_json::Value,
    },

    /// List daily records for a city, oldest first
    List {
        /// City name (defaults to the configured or selected city)
        city: Option<String>,

        /// First date to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<Date>,

        /// Last date to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        to: Option<Date>,
    },

    /// Export daily records as CSV
    Export {
        /// City name (all cities if omitted)
        city: Option<String>,

        /// First date to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<Date>,

        /// Last date to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        to: Option<Date>,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum PreferenceAction {
    /// Print a preference value
    Get {
        /// Preference key (e.g. aqiThreshold, theme, selectedCity)
        key: String,
    },

    /// Set a preference; values that are not valid JSON are stored as strings
    Set {
        /// Preference key
        key: String,

        /// Preference value
        value: String,
    },

    /// List all preferences
    List,

    /// Remove a preference
    #[command(alias = "rm")]
    Remove {
        /// Preference key
        key: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum FavoriteAction {
    /// Add a city to the favorites
    Add {
        /// City name
        city: String,
    },

    /// Remove a city from the favorites
    #[command(alias = "rm")]
    Remove {
        /// City name
        city: String,
    },

    /// List favorite cities
    List,

    /// Check whether a city is a favorite
    Check {
        /// City name
        city: String,
    },
}

/// Configuration subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init,
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<Date, String> {
    Date::parse(s, time::macros::format_description!("[year]-[month]-[day]"))
        .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD", s))
}

fn parse_threshold(s: &str) -> Result<AqiThreshold, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_json(s: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(s).map_err(|e| format!("Invalid JSON: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use time::macros::date;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-31"), Ok(date!(2024 - 01 - 31)));
        assert!(parse_date("31/01/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_parse_threshold_bounds() {
        assert_eq!(parse_threshold("0").unwrap().value(), 0);
        assert_eq!(parse_threshold("500").unwrap().value(), 500);
        assert!(parse_threshold("501").is_err());
        assert!(parse_threshold("-1").is_err());
        assert!(parse_threshold("high").is_err());
    }

    #[test]
    fn test_parse_json() {
        assert_eq!(parse_json("150"), Ok(serde_json::json!(150)));
        assert!(parse_json("{not json").is_err());
    }

    #[test]
    fn test_reading_save_requires_aqi_or_payload() {
        let result = Cli::try_parse_from(["airq", "reading", "save", "Delhi"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["airq", "reading", "save", "Delhi", "--aqi", "42"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Reading {
                action: ReadingAction::Save { aqi: Some(42), .. }
            }
        ));
    }

    #[test]
    fn test_aliases() {
        let cli = Cli::try_parse_from(["airq", "fav", "rm", "Pune"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Favorite {
                action: FavoriteAction::Remove { .. }
            }
        ));

        let cli = Cli::try_parse_from(["airq", "pref", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Preference {
                action: PreferenceAction::List
            }
        ));
    }

    #[test]
    fn test_seed_days_is_bounded() {
        let cli = Cli::try_parse_from(["airq", "seed", "Delhi", "--days", "3650"]).unwrap();
        assert!(matches!(cli.command, Commands::Seed { days: 3650, .. }));

        assert!(Cli::try_parse_from(["airq", "seed", "Delhi", "--days", "3651"]).is_err());
        assert!(Cli::try_parse_from(["airq", "seed", "Delhi", "--days", "0"]).is_err());
        assert!(Cli::try_parse_from(["airq", "seed", "Delhi", "--days", "4294967295"]).is_err());
    }

    #[test]
    fn test_theme_toggle_conflicts_with_value() {
        assert!(Cli::try_parse_from(["airq", "theme", "light", "--toggle"]).is_err());
        assert!(Cli::try_parse_from(["airq", "theme", "--toggle"]).is_ok());
    }
}
