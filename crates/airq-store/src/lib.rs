//! Local data persistence for the air-quality dashboard.
//!
//! This crate provides SQLite-based storage so the dashboard keeps working
//! offline and can chart trends without re-fetching.
//!
//! # Features
//!
//! - Append-only current readings per city, newest-first lookups
//! - One daily aggregate per city and date, inclusive date-range queries
//! - Key-value preferences (alert threshold, theme, selected city)
//! - A set of favorite cities
//! - Retention cleanup (30 days of readings, 90 days of history by default)
//! - CSV export of historical records
//!
//! [`LocalStore`] is the async handle applications share. [`Store`] is the
//! synchronous core it wraps, usable directly from blocking code.
//!
//! # Example
//!
//! ```no_run
//! use airq_store::{LocalStore, StoreLocation};
//! use serde_json::json;
//!
//! # async fn run() -> airq_store::Result<()> {
//! let store = LocalStore::open_at(StoreLocation::default_file()).await?;
//!
//! store.save_reading("Delhi", &json!({ "aqi": 182 })).await?;
//! let recent = store.get_readings("Delhi", Some(10)).await?;
//!
//! let report = store.cleanup_default().await?;
//! println!("{} records pruned", report.total());
//! # let _ = recent;
//! # Ok(())
//! # }
//! ```

mod clock;
mod error;
mod handle;
mod models;
mod queries;
mod schema;
mod store;

pub use clock::{Clock, MockClock, SystemClock};
pub use error::{Error, Result};
pub use handle::LocalStore;
pub use models::{
    CleanupReport, Favorite, Preference, RetentionPolicy, StoredHistoricalRecord, StoredReading,
};
pub use queries::{HistoricalQuery, ReadingQuery};
pub use schema::SCHEMA_VERSION;
pub use store::{DEFAULT_READING_LIMIT, Store, StoreLocation};

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/airq/airq.db`
/// - macOS: `~/Library/Application Support/airq/airq.db`
/// - Windows: `C:\Users\<user>\AppData\Local\airq\airq.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("airq")
        .join("airq.db")
}
