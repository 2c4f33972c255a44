//! Command-line interface for the air-quality dashboard's local store.
//!
//! The `airq` binary opens the same SQLite database the dashboard uses and
//! exposes its four collections from the shell.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `reading` | Save, list and show the latest current readings |
//! | `history` | Save, list and export daily historical records |
//! | `pref` | Get, set, list and remove preferences |
//! | `fav` | Add, remove, list and check favorite cities |
//! | `threshold` | Show or set the AQI alert threshold |
//! | `theme` | Show, set or toggle the theme |
//! | `cleanup` | Apply the retention windows |
//! | `seed` | Generate sample data for a city |
//! | `stats` | Show record counts |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Configuration
//!
//! The CLI reads `~/.config/airq/config.toml` (or platform equivalent):
//!
//! - `db_path`: Database file
//! - `default_city`: City used when a command omits one
//! - `max_favorites`: Favorite limit (default 5)
//! - `[retention]`: `reading_days` (default 30) and `history_days` (default 90)
//!
//! # Environment Variables
//!
//! - `AIRQ_DB`: Database file (overridden by `--db`)
//! - `NO_COLOR`: Disable colored output when set
//! - `RUST_LOG`: Log filter when neither `--quiet` nor `--verbose` is given
//!
//! # Examples
//!
//! ```bash
//! airq seed Delhi --days 14
//! airq reading latest Delhi --json
//! airq history export Delhi --from 2024-01-01 --output delhi.csv
//! airq cleanup --reading-days 7
//! ```

// Re-export core dependencies for convenience
pub use airq_store;
pub use airq_types;
