//! Asynchronous handle with an explicit open/close lifecycle.

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use time::Date;
use tokio::sync::Mutex;
use tracing::{debug, info};

use airq_types::{AqiThreshold, Theme};

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::models::{
    CleanupReport, Favorite, Preference, RetentionPolicy, StoredHistoricalRecord, StoredReading,
};
use crate::queries::{HistoricalQuery, ReadingQuery};
use crate::store::{Store, StoreLocation};

/// Shared handle to the local store.
///
/// A handle starts closed. [`open`](Self::open) connects and migrates the
/// schema; until then, and after [`close`](Self::close), every operation
/// fails with [`Error::StoreClosed`]. Construct one handle and share it
/// behind an `Arc`; calls are serialized on a single connection and complete
/// in the order they acquire it.
///
/// ```no_run
/// use airq_store::{LocalStore, StoreLocation};
///
/// # async fn run() -> airq_store::Result<()> {
/// let store = LocalStore::open_at(StoreLocation::default_file()).await?;
/// store.add_favorite("Delhi").await?;
/// let threshold = store.aqi_threshold().await?;
/// store.close().await?;
/// # let _ = threshold;
/// # Ok(())
/// # }
/// ```
pub struct LocalStore {
    location: StoreLocation,
    clock: Arc<dyn Clock>,
    store: Mutex<Option<Store>>,
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl LocalStore {
    /// Create a closed handle for `location` using the system clock.
    pub fn new(location: StoreLocation) -> Self {
        Self::with_clock(location, Arc::new(SystemClock))
    }

    /// Create a closed handle for `location` with a custom clock.
    pub fn with_clock(location: StoreLocation, clock: Arc<dyn Clock>) -> Self {
        Self {
            location,
            clock,
            store: Mutex::new(None),
        }
    }

    /// Create a handle and open it.
    pub async fn open_at(location: StoreLocation) -> Result<Self> {
        let handle = Self::new(location);
        handle.open().await?;
        Ok(handle)
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Open the database. Opening an open handle does nothing.
    pub async fn open(&self) -> Result<()> {
        let mut guard = self.store.lock().await;
        if guard.is_some() {
            debug!("Store at {} is already open", self.location);
            return Ok(());
        }

        let store = Store::open_with_clock(&self.location, Arc::clone(&self.clock))?;
        *guard = Some(store);
        info!("Local store ready at {}", self.location);
        Ok(())
    }

    /// Close the database. Closing a closed handle does nothing.
    pub async fn close(&self) -> Result<()> {
        let store = self.store.lock().await.take();
        match store {
            Some(store) => {
                store.close()?;
                info!("Closed local store at {}", self.location);
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub async fn is_open(&self) -> bool {
        self.store.lock().await.is_some()
    }

    /// Run `f` against the open store.
    async fn with_store<T>(&self, f: impl FnOnce(&Store) -> Result<T>) -> Result<T> {
        let guard = self.store.lock().await;
        let store = guard.as_ref().ok_or(Error::StoreClosed)?;
        f(store)
    }

    // === Readings ===

    /// Append a reading for `city`. Returns the record id.
    pub async fn save_reading<T>(&self, city: &str, payload: &T) -> Result<String>
    where
        T: Serialize + Sync + ?Sized,
    {
        self.with_store(|store| store.save_reading(city, payload))
            .await
    }

    /// The most recent readings for `city`, newest first, 50 by default.
    pub async fn get_readings(&self, city: &str, limit: Option<u32>) -> Result<Vec<StoredReading>> {
        self.with_store(|store| store.get_readings(city, limit)).await
    }

    pub async fn get_latest_reading(&self, city: &str) -> Result<Option<StoredReading>> {
        self.with_store(|store| store.get_latest_reading(city)).await
    }

    pub async fn query_readings(&self, query: &ReadingQuery) -> Result<Vec<StoredReading>> {
        self.with_store(|store| store.query_readings(query)).await
    }

    pub async fn count_readings(&self, city: Option<&str>) -> Result<u64> {
        self.with_store(|store| store.count_readings(city)).await
    }

    // === Historical ===

    /// Insert or replace the daily record for `city` on `date`.
    pub async fn save_historical<T>(&self, city: &str, date: Date, payload: &T) -> Result<String>
    where
        T: Serialize + Sync + ?Sized,
    {
        self.with_store(|store| store.save_historical(city, date, payload))
            .await
    }

    /// Daily records for `city` dated `start..=end`, oldest first.
    pub async fn get_historical(
        &self,
        city: &str,
        start: Date,
        end: Date,
    ) -> Result<Vec<StoredHistoricalRecord>> {
        self.with_store(|store| store.get_historical(city, start, end))
            .await
    }

    pub async fn query_historical(
        &self,
        query: &HistoricalQuery,
    ) -> Result<Vec<StoredHistoricalRecord>> {
        self.with_store(|store| store.query_historical(query)).await
    }

    pub async fn count_historical(&self, city: Option<&str>) -> Result<u64> {
        self.with_store(|store| store.count_historical(city)).await
    }

    /// Write matching historical records as CSV. Returns the row count.
    pub async fn export_historical_csv<W>(&self, query: &HistoricalQuery, writer: W) -> Result<usize>
    where
        W: Write + Send,
    {
        self.with_store(|store| store.export_historical_csv(query, writer))
            .await
    }

    // === Preferences ===

    pub async fn set_preference<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        self.with_store(|store| store.set_preference(key, value))
            .await
    }

    /// Get a preference, or `None` if it was never set.
    pub async fn get_preference<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.with_store(|store| store.get_preference(key)).await
    }

    pub async fn list_preferences(&self) -> Result<Vec<Preference>> {
        self.with_store(|store| store.list_preferences()).await
    }

    pub async fn remove_preference(&self, key: &str) -> Result<bool> {
        self.with_store(|store| store.remove_preference(key)).await
    }

    pub async fn aqi_threshold(&self) -> Result<AqiThreshold> {
        self.with_store(|store| store.aqi_threshold()).await
    }

    pub async fn set_aqi_threshold(&self, threshold: AqiThreshold) -> Result<()> {
        self.with_store(|store| store.set_aqi_threshold(threshold))
            .await
    }

    pub async fn theme(&self) -> Result<Theme> {
        self.with_store(|store| store.theme()).await
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<()> {
        self.with_store(|store| store.set_theme(theme)).await
    }

    pub async fn selected_city(&self) -> Result<Option<String>> {
        self.with_store(|store| store.selected_city()).await
    }

    pub async fn set_selected_city(&self, city: &str) -> Result<()> {
        self.with_store(|store| store.set_selected_city(city)).await
    }

    // === Favorites ===

    pub async fn add_favorite(&self, city: &str) -> Result<()> {
        self.with_store(|store| store.add_favorite(city)).await
    }

    /// Returns whether `city` was a favorite.
    pub async fn remove_favorite(&self, city: &str) -> Result<bool> {
        self.with_store(|store| store.remove_favorite(city)).await
    }

    pub async fn list_favorites(&self) -> Result<Vec<Favorite>> {
        self.with_store(|store| store.list_favorites()).await
    }

    pub async fn is_favorite(&self, city: &str) -> Result<bool> {
        self.with_store(|store| store.is_favorite(city)).await
    }

    // === Retention ===

    /// Prune expired readings and historical records.
    pub async fn cleanup(&self, policy: RetentionPolicy) -> Result<CleanupReport> {
        self.with_store(|store| store.cleanup(policy)).await
    }

    /// Prune with the default 30 and 90 day windows.
    pub async fn cleanup_default(&self) -> Result<CleanupReport> {
        self.cleanup(RetentionPolicy::default()).await
    }
}
