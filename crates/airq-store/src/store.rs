//! Synchronous store over a single SQLite connection.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use serde::de::DeserializeOwned;
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, OffsetDateTime};
use tracing::{debug, info};

use airq_types::{AqiThreshold, Theme, keys};

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, OperationContext, Result};
use crate::models::{
    CleanupReport, Favorite, Preference, RetentionPolicy, StoredHistoricalRecord, StoredReading,
};
use crate::queries::{HistoricalQuery, ReadingQuery};
use crate::schema;

/// Number of readings returned by [`Store::get_readings`] when no limit is given.
pub const DEFAULT_READING_LIMIT: u32 = 50;

/// How long a connection waits on a lock held by another process.
const BUSY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A database file. Parent directories are created on open.
    File(PathBuf),
    /// A private in-memory database. Its contents are lost when the
    /// connection is closed.
    InMemory,
}

impl StoreLocation {
    /// The platform default database file, see [`crate::default_db_path`].
    pub fn default_file() -> Self {
        Self::File(crate::default_db_path())
    }
}

impl From<PathBuf> for StoreLocation {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for StoreLocation {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreLocation::File(path) => write!(f, "{}", path.display()),
            StoreLocation::InMemory => write!(f, ":memory:"),
        }
    }
}

/// SQLite-based store for air-quality data.
pub struct Store {
    conn: Connection,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.conn.path())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_clock(&StoreLocation::from(path.as_ref()), Arc::new(SystemClock))
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open_with_clock(&StoreLocation::default_file(), Arc::new(SystemClock))
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::open_with_clock(&StoreLocation::InMemory, Arc::new(SystemClock))
    }

    /// Open a database at `location`, taking capture instants and retention
    /// cutoffs from `clock`.
    pub fn open_with_clock(location: &StoreLocation, clock: Arc<dyn Clock>) -> Result<Self> {
        let unavailable = |source| Error::StorageUnavailable {
            location: location.to_string(),
            source,
        };

        let mut conn = match location {
            StoreLocation::File(path) => {
                // Create parent directories if needed
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                            path: parent.to_path_buf(),
                            source: e,
                        })?;
                    }
                }

                info!("Opening database at {}", path.display());
                let conn = Connection::open(path).map_err(unavailable)?;
                conn.execute_batch(
                    "PRAGMA journal_mode = WAL;
                     PRAGMA synchronous = NORMAL;",
                )
                .map_err(unavailable)?;
                conn.busy_timeout(BUSY_TIMEOUT).map_err(unavailable)?;
                conn
            }
            StoreLocation::InMemory => {
                debug!("Opening in-memory database");
                Connection::open_in_memory().map_err(unavailable)?
            }
        };

        schema::initialize(&mut conn).map_err(unavailable)?;

        Ok(Self { conn, clock })
    }

    /// Close the underlying connection.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, source)| Error::Engine {
            operation: "close",
            source,
        })
    }

    /// The current instant according to this store's clock.
    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }
}

// Reading operations
impl Store {
    /// Append a reading for `city`, captured now. Returns the record id.
    ///
    /// Ids take the form `{city}_{unix_millis}`. A second reading for the
    /// same city in the same millisecond gets a numeric suffix instead of
    /// replacing the first.
    pub fn save_reading<T>(&self, city: &str, payload: &T) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_string(payload).during("save_reading")?;
        let captured_at = unix_millis(self.clock.now());

        let tx = self.conn.unchecked_transaction().during("save_reading")?;

        let base = format!("{city}_{captured_at}");
        let mut id = base.clone();
        let mut suffix = 1u32;
        while tx
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM readings WHERE id = ?)",
                [&id],
                |row| row.get::<_, bool>(0),
            )
            .during("save_reading")?
        {
            id = format!("{base}_{suffix}");
            suffix += 1;
        }

        tx.execute(
            "INSERT INTO readings (id, city, captured_at, payload) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![id, city, captured_at, payload],
        )
        .during("save_reading")?;
        tx.commit().during("save_reading")?;

        debug!("Saved reading {}", id);
        Ok(id)
    }

    /// The most recent readings for `city`, newest first.
    ///
    /// Returns at most `limit` readings, [`DEFAULT_READING_LIMIT`] if `None`.
    pub fn get_readings(&self, city: &str, limit: Option<u32>) -> Result<Vec<StoredReading>> {
        let query = ReadingQuery::new()
            .city(city)
            .limit(limit.unwrap_or(DEFAULT_READING_LIMIT));
        self.query_readings(&query)
    }

    /// Get the latest reading for a city.
    pub fn get_latest_reading(&self, city: &str) -> Result<Option<StoredReading>> {
        let query = ReadingQuery::new().city(city).limit(1);
        let mut readings = self.query_readings(&query)?;
        Ok(readings.pop())
    }

    /// Query readings with filters.
    pub fn query_readings(&self, query: &ReadingQuery) -> Result<Vec<StoredReading>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql).during("query_readings")?;
        let rows = stmt
            .query_map(params_ref.as_slice(), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .during("query_readings")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .during("query_readings")?;

        rows.into_iter()
            .map(|(id, city, captured_at, payload)| {
                Ok(StoredReading {
                    id,
                    city,
                    captured_at: from_unix_millis(captured_at)?,
                    payload: serde_json::from_str(&payload).during("query_readings")?,
                })
            })
            .collect()
    }

    /// Count readings, optionally for one city.
    pub fn count_readings(&self, city: Option<&str>) -> Result<u64> {
        let count: i64 = match city {
            Some(city) => self.conn.query_row(
                "SELECT COUNT(*) FROM readings WHERE city = ?",
                [city],
                |row| row.get(0),
            ),
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0)),
        }
        .during("count_readings")?;

        Ok(count as u64)
    }
}

// Historical operations
impl Store {
    /// Insert or replace the daily record for `city` on `date`.
    ///
    /// Returns the record id, `{city}_{YYYY-MM-DD}`.
    pub fn save_historical<T>(&self, city: &str, date: Date, payload: &T) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_string(payload).during("save_historical")?;
        let date = format_date(date);
        let id = format!("{city}_{date}");
        let synced_at = unix_millis(self.clock.now());

        self.conn
            .execute(
                "INSERT INTO historical (id, city, date, synced_at, payload)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(city, date) DO UPDATE SET
                    synced_at = excluded.synced_at,
                    payload = excluded.payload",
                rusqlite::params![id, city, date, synced_at, payload],
            )
            .during("save_historical")?;

        debug!("Saved historical record {}", id);
        Ok(id)
    }

    /// Daily records for `city` dated `start..=end`, oldest first.
    pub fn get_historical(
        &self,
        city: &str,
        start: Date,
        end: Date,
    ) -> Result<Vec<StoredHistoricalRecord>> {
        let query = HistoricalQuery::new().city(city).from(start).to(end);
        self.query_historical(&query)
    }

    /// Query historical records with filters.
    pub fn query_historical(&self, query: &HistoricalQuery) -> Result<Vec<StoredHistoricalRecord>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql).during("query_historical")?;
        let rows = stmt
            .query_map(params_ref.as_slice(), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .during("query_historical")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .during("query_historical")?;

        rows.into_iter()
            .map(|(id, city, date, synced_at, payload)| {
                Ok(StoredHistoricalRecord {
                    id,
                    city,
                    date: parse_date(&date)?,
                    synced_at: from_unix_millis(synced_at)?,
                    payload: serde_json::from_str(&payload).during("query_historical")?,
                })
            })
            .collect()
    }

    /// Count historical records, optionally for one city.
    pub fn count_historical(&self, city: Option<&str>) -> Result<u64> {
        let count: i64 = match city {
            Some(city) => self.conn.query_row(
                "SELECT COUNT(*) FROM historical WHERE city = ?",
                [city],
                |row| row.get(0),
            ),
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM historical", [], |row| row.get(0)),
        }
        .during("count_historical")?;

        Ok(count as u64)
    }

    /// Write the records matched by `query` as CSV with the columns
    /// `city,date,synced_at,payload`. Returns the number of rows written.
    pub fn export_historical_csv<W: Write>(
        &self,
        query: &HistoricalQuery,
        writer: W,
    ) -> Result<usize> {
        let records = self.query_historical(query)?;

        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["city", "date", "synced_at", "payload"])?;
        for record in &records {
            let synced_at = record
                .synced_at
                .format(&Rfc3339)
                .map_err(|e| Error::InvalidTimestamp(e.to_string()))?;
            csv.write_record([
                record.city.as_str(),
                format_date(record.date).as_str(),
                synced_at.as_str(),
                record.payload.to_string().as_str(),
            ])?;
        }
        csv.flush().map_err(csv::Error::from)?;

        info!("Exported {} historical records", records.len());
        Ok(records.len())
    }
}

// Preference operations
impl Store {
    /// Insert or replace a preference.
    pub fn set_preference<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_string(value).during("set_preference")?;
        let now = unix_millis(self.clock.now());

        self.conn
            .execute(
                "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                rusqlite::params![key, value, now],
            )
            .during("set_preference")?;

        debug!("Set preference {}", key);
        Ok(())
    }

    /// Get a preference, or `None` if it was never set.
    pub fn get_preference<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()
            .during("get_preference")?;

        raw.map(|value| serde_json::from_str(&value))
            .transpose()
            .during("get_preference")
    }

    /// List all preferences ordered by key.
    pub fn list_preferences(&self) -> Result<Vec<Preference>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value, updated_at FROM preferences ORDER BY key")
            .during("list_preferences")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })
            .during("list_preferences")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .during("list_preferences")?;

        rows.into_iter()
            .map(|(key, value, updated_at)| {
                Ok(Preference {
                    key,
                    value: serde_json::from_str(&value).during("list_preferences")?,
                    updated_at: from_unix_millis(updated_at)?,
                })
            })
            .collect()
    }

    /// Remove a preference. Returns whether it existed.
    pub fn remove_preference(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM preferences WHERE key = ?", [key])
            .during("remove_preference")?;
        Ok(removed > 0)
    }

    /// The alert threshold, or [`AqiThreshold::DEFAULT`] if unset.
    pub fn aqi_threshold(&self) -> Result<AqiThreshold> {
        Ok(self
            .get_preference(keys::AQI_THRESHOLD)?
            .unwrap_or_default())
    }

    pub fn set_aqi_threshold(&self, threshold: AqiThreshold) -> Result<()> {
        self.set_preference(keys::AQI_THRESHOLD, &threshold)
    }

    /// The UI theme, dark if unset.
    pub fn theme(&self) -> Result<Theme> {
        Ok(self.get_preference(keys::THEME)?.unwrap_or_default())
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.set_preference(keys::THEME, &theme)
    }

    pub fn selected_city(&self) -> Result<Option<String>> {
        self.get_preference(keys::SELECTED_CITY)
    }

    pub fn set_selected_city(&self, city: &str) -> Result<()> {
        self.set_preference(keys::SELECTED_CITY, city)
    }
}

// Favorite operations
impl Store {
    /// Mark `city` as a favorite. Adding an existing favorite refreshes its
    /// `added_at`.
    pub fn add_favorite(&self, city: &str) -> Result<()> {
        let now = unix_millis(self.clock.now());
        self.conn
            .execute(
                "INSERT INTO favorites (city, added_at) VALUES (?1, ?2)
                 ON CONFLICT(city) DO UPDATE SET added_at = excluded.added_at",
                rusqlite::params![city, now],
            )
            .during("add_favorite")?;
        debug!("Added favorite {}", city);
        Ok(())
    }

    /// Remove `city` from the favorites. Returns whether it was present.
    pub fn remove_favorite(&self, city: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM favorites WHERE city = ?", [city])
            .during("remove_favorite")?;
        Ok(removed > 0)
    }

    /// All favorites, earliest added first.
    pub fn list_favorites(&self) -> Result<Vec<Favorite>> {
        let mut stmt = self
            .conn
            .prepare("SELECT city, added_at FROM favorites ORDER BY added_at, city")
            .during("list_favorites")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .during("list_favorites")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .during("list_favorites")?;

        rows.into_iter()
            .map(|(city, added_at)| {
                Ok(Favorite {
                    city,
                    added_at: from_unix_millis(added_at)?,
                })
            })
            .collect()
    }

    pub fn is_favorite(&self, city: &str) -> Result<bool> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM favorites WHERE city = ?)",
                [city],
                |row| row.get(0),
            )
            .during("is_favorite")
    }
}

// Retention
impl Store {
    /// Delete readings and historical records older than `policy` allows.
    ///
    /// A reading is removed when it was captured strictly before
    /// `now - reading_days`. A historical record is removed when its date is
    /// on or before the calendar date of `now - history_days`. Each
    /// collection is pruned in its own transaction.
    ///
    /// A window reaching past the earliest representable instant keeps
    /// everything in that collection.
    pub fn cleanup(&self, policy: RetentionPolicy) -> Result<CleanupReport> {
        let now = self.clock.now();
        let reading_cutoff = retention_cutoff(now, policy.reading_days).map(unix_millis);
        let history_cutoff =
            retention_cutoff(now, policy.history_days).map(|cutoff| format_date(cutoff.date()));

        let readings_deleted = match reading_cutoff {
            Some(cutoff) => self.delete_before(
                "cleanup_readings",
                "DELETE FROM readings WHERE captured_at < ?",
                &cutoff,
            )?,
            None => 0,
        };
        let historical_deleted = match history_cutoff {
            Some(cutoff) => self.delete_before(
                "cleanup_historical",
                "DELETE FROM historical WHERE date <= ?",
                &cutoff,
            )?,
            None => 0,
        };

        let report = CleanupReport {
            readings_deleted,
            historical_deleted,
        };
        info!(
            "Cleanup removed {} readings and {} historical records",
            report.readings_deleted, report.historical_deleted
        );
        Ok(report)
    }

    fn delete_before(
        &self,
        operation: &'static str,
        sql: &str,
        cutoff: &dyn rusqlite::ToSql,
    ) -> Result<usize> {
        let tx = self.conn.unchecked_transaction().during(operation)?;
        let deleted = tx.execute(sql, rusqlite::params![cutoff]).during(operation)?;
        tx.commit().during(operation)?;
        Ok(deleted)
    }
}

/// `now - days`, or `None` when that falls before the earliest date `time`
/// can represent.
fn retention_cutoff(now: OffsetDateTime, days: u32) -> Option<OffsetDateTime> {
    now.checked_sub(Duration::days(i64::from(days)))
}

/// Milliseconds since the Unix epoch.
pub(crate) fn unix_millis(time: OffsetDateTime) -> i64 {
    (time.unix_timestamp_nanos() / 1_000_000) as i64
}

pub(crate) fn from_unix_millis(millis: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|e| Error::InvalidTimestamp(format!("{millis}: {e}")))
}

/// `YYYY-MM-DD`, which sorts the same lexicographically and by calendar.
pub(crate) fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

pub(crate) fn parse_date(s: &str) -> Result<Date> {
    Date::parse(s, time::macros::format_description!("[year]-[month]-[day]"))
        .map_err(|e| Error::InvalidTimestamp(format!("{s}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use airq_types::{AqiReading, DailyAqi};
    use serde_json::json;
    use time::macros::{date, datetime};

    fn mock_store() -> (Store, Arc<MockClock>) {
        let clock = Arc::new(MockClock::with_time(datetime!(2024-03-15 12:00:00 UTC)));
        let store = Store::open_with_clock(&StoreLocation::InMemory, clock.clone()).unwrap();
        (store, clock)
    }

    fn create_test_reading(city: &str, aqi: u16) -> AqiReading {
        AqiReading {
            aqi: Some(aqi),
            city: city.to_string(),
            time: "2024-03-15 12:00:00".to_string(),
            pollutants: Default::default(),
            weather: Default::default(),
            dominant_pollutant: Some("pm25".to_string()),
        }
    }

    #[test]
    fn test_open_in_memory() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.count_readings(None).unwrap(), 0);
        assert!(store.list_favorites().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_get_reading() {
        let (store, _) = mock_store();
        let reading = create_test_reading("Delhi", 182);

        let id = store.save_reading("Delhi", &reading).unwrap();
        assert_eq!(id, "Delhi_1710504000000");

        let readings = store.get_readings("Delhi", None).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].id, id);
        assert_eq!(readings[0].captured_at, datetime!(2024-03-15 12:00:00 UTC));

        let decoded: AqiReading = readings[0].payload_as().unwrap();
        assert_eq!(decoded, reading);
    }

    #[test]
    fn test_same_millisecond_readings_are_distinct() {
        let (store, _) = mock_store();

        let first = store.save_reading("Delhi", &json!({ "aqi": 1 })).unwrap();
        let second = store.save_reading("Delhi", &json!({ "aqi": 2 })).unwrap();
        let third = store.save_reading("Delhi", &json!({ "aqi": 3 })).unwrap();

        assert_eq!(second, format!("{first}_1"));
        assert_eq!(third, format!("{first}_2"));
        assert_eq!(store.count_readings(Some("Delhi")).unwrap(), 3);

        // Insertion order breaks the tie
        let latest = store.get_latest_reading("Delhi").unwrap().unwrap();
        assert_eq!(latest.payload["aqi"], 3);
    }

    #[test]
    fn test_get_readings_newest_first_with_limit() {
        let (store, clock) = mock_store();
        for aqi in 0..60 {
            store.save_reading("Delhi", &json!({ "aqi": aqi })).unwrap();
            clock.advance(Duration::minutes(10));
        }
        store.save_reading("Mumbai", &json!({ "aqi": 999 })).unwrap();

        let readings = store.get_readings("Delhi", None).unwrap();
        assert_eq!(readings.len(), DEFAULT_READING_LIMIT as usize);
        assert_eq!(readings[0].payload["aqi"], 59);
        assert!(readings.iter().all(|r| r.city == "Delhi"));
        assert!(
            readings
                .windows(2)
                .all(|pair| pair[0].captured_at >= pair[1].captured_at)
        );

        let three = store.get_readings("Delhi", Some(3)).unwrap();
        let aqis: Vec<_> = three.iter().map(|r| r.payload["aqi"].clone()).collect();
        assert_eq!(aqis, vec![json!(59), json!(58), json!(57)]);
    }

    #[test]
    fn test_get_latest_reading_absent() {
        let (store, _) = mock_store();
        assert!(store.get_latest_reading("Nowhere").unwrap().is_none());
        assert!(store.get_readings("Nowhere", None).unwrap().is_empty());
    }

    #[test]
    fn test_query_readings_time_range() {
        let (store, clock) = mock_store();
        for day in 0..5 {
            store.save_reading("Pune", &json!({ "day": day })).unwrap();
            clock.advance(Duration::days(1));
        }

        let query = ReadingQuery::new()
            .city("Pune")
            .since(datetime!(2024-03-16 00:00:00 UTC))
            .until(datetime!(2024-03-18 00:00:00 UTC))
            .oldest_first();
        let readings = store.query_readings(&query).unwrap();

        let days: Vec<_> = readings.iter().map(|r| r.payload["day"].clone()).collect();
        assert_eq!(days, vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_save_historical_upsert() {
        let (store, clock) = mock_store();
        let day = date!(2024 - 03 - 10);

        let first = DailyAqi {
            aqi_avg: 120.0,
            aqi_min: 80,
            aqi_max: 160,
            dominant_pollutant: Some("pm25".to_string()),
        };
        let id = store.save_historical("Delhi", day, &first).unwrap();
        assert_eq!(id, "Delhi_2024-03-10");

        clock.advance(Duration::hours(1));
        let second = DailyAqi {
            aqi_avg: 140.0,
            ..first.clone()
        };
        store.save_historical("Delhi", day, &second).unwrap();

        assert_eq!(store.count_historical(Some("Delhi")).unwrap(), 1);
        let records = store.get_historical("Delhi", day, day).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].payload_as::<DailyAqi>().unwrap(), second);
        assert_eq!(records[0].synced_at, datetime!(2024-03-15 13:00:00 UTC));
    }

    #[test]
    fn test_get_historical_inclusive_ascending() {
        let (store, _) = mock_store();
        for day in [5u8, 1, 3, 2, 4] {
            let date = Date::from_calendar_date(2024, time::Month::March, day).unwrap();
            store
                .save_historical("Delhi", date, &json!({ "day": day }))
                .unwrap();
            store
                .save_historical("Mumbai", date, &json!({ "day": day }))
                .unwrap();
        }

        let records = store
            .get_historical("Delhi", date!(2024 - 03 - 02), date!(2024 - 03 - 04))
            .unwrap();
        let dates: Vec<_> = records.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2024 - 03 - 02),
                date!(2024 - 03 - 03),
                date!(2024 - 03 - 04)
            ]
        );
        assert!(records.iter().all(|r| r.city == "Delhi"));

        // Reversed range is empty, not an error
        let empty = store
            .get_historical("Delhi", date!(2024 - 03 - 04), date!(2024 - 03 - 02))
            .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_export_historical_csv() {
        let (store, _) = mock_store();
        store
            .save_historical("Delhi", date!(2024 - 03 - 01), &json!({ "aqi_avg": 101.5 }))
            .unwrap();
        store
            .save_historical("Delhi", date!(2024 - 03 - 02), &json!({ "aqi_avg": 99.0 }))
            .unwrap();

        let mut out = Vec::new();
        let written = store
            .export_historical_csv(&HistoricalQuery::new().city("Delhi"), &mut out)
            .unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "city,date,synced_at,payload");
        assert!(lines[1].starts_with("Delhi,2024-03-01,2024-03-15T12:00:00Z,"));
        assert!(lines[1].contains("aqi_avg"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_preferences_roundtrip() {
        let (store, _) = mock_store();

        assert_eq!(store.get_preference::<u16>("aqiThreshold").unwrap(), None);

        store.set_preference("aqiThreshold", &150).unwrap();
        assert_eq!(store.get_preference::<u16>("aqiThreshold").unwrap(), Some(150));

        store.set_preference("aqiThreshold", &200).unwrap();
        assert_eq!(store.get_preference::<u16>("aqiThreshold").unwrap(), Some(200));

        store.set_preference("selectedCity", "Delhi").unwrap();
        let prefs = store.list_preferences().unwrap();
        let keys: Vec<_> = prefs.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["aqiThreshold", "selectedCity"]);

        assert!(store.remove_preference("selectedCity").unwrap());
        assert!(!store.remove_preference("selectedCity").unwrap());
        assert_eq!(store.get_preference::<String>("selectedCity").unwrap(), None);
    }

    #[test]
    fn test_preference_wrong_type() {
        let (store, _) = mock_store();
        store.set_preference("theme", "dark").unwrap();

        let result = store.get_preference::<u16>("theme");
        assert!(matches!(
            result,
            Err(Error::Serialization {
                operation: "get_preference",
                ..
            })
        ));
    }

    #[test]
    fn test_typed_preferences() {
        let (store, _) = mock_store();

        assert_eq!(store.aqi_threshold().unwrap(), AqiThreshold::DEFAULT);
        assert_eq!(store.theme().unwrap(), Theme::Dark);
        assert_eq!(store.selected_city().unwrap(), None);

        store.set_aqi_threshold(AqiThreshold::new(75).unwrap()).unwrap();
        store.set_theme(Theme::Light).unwrap();
        store.set_selected_city("Chennai").unwrap();

        assert_eq!(store.aqi_threshold().unwrap().value(), 75);
        assert_eq!(store.theme().unwrap(), Theme::Light);
        assert_eq!(store.selected_city().unwrap().as_deref(), Some("Chennai"));
        // Stored under the dashboard's key names
        assert_eq!(store.get_preference::<String>("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_favorites() {
        let (store, clock) = mock_store();

        store.add_favorite("Delhi").unwrap();
        clock.advance(Duration::seconds(1));
        store.add_favorite("Mumbai").unwrap();
        clock.advance(Duration::seconds(1));
        store.add_favorite("Delhi").unwrap();

        let favorites = store.list_favorites().unwrap();
        let cities: Vec<_> = favorites.iter().map(|f| f.city.as_str()).collect();
        // Re-adding refreshes added_at
        assert_eq!(cities, vec!["Mumbai", "Delhi"]);

        assert!(store.is_favorite("Delhi").unwrap());
        assert!(store.remove_favorite("Delhi").unwrap());
        assert!(!store.remove_favorite("Delhi").unwrap());
        assert!(!store.is_favorite("Delhi").unwrap());
    }

    #[test]
    fn test_cleanup_boundaries() {
        let (store, clock) = mock_store();
        let now = clock.now();

        for days_ago in [90, 31, 29, 0] {
            clock.set_time(now - Duration::days(days_ago));
            store
                .save_reading("Delhi", &json!({ "days_ago": days_ago }))
                .unwrap();
        }
        clock.set_time(now);

        for days_ago in [120i64, 91, 90, 10] {
            let date = (now - Duration::days(days_ago)).date();
            store
                .save_historical("Delhi", date, &json!({ "days_ago": days_ago }))
                .unwrap();
        }

        let report = store.cleanup(RetentionPolicy::default()).unwrap();
        assert_eq!(report.readings_deleted, 2);
        assert_eq!(report.historical_deleted, 3);

        let kept: Vec<_> = store
            .get_readings("Delhi", None)
            .unwrap()
            .iter()
            .map(|r| r.payload["days_ago"].clone())
            .collect();
        assert_eq!(kept, vec![json!(0), json!(29)]);

        // The record dated on the cutoff day goes too
        let history = store.query_historical(&HistoricalQuery::new()).unwrap();
        let kept: Vec<_> = history.iter().map(|r| r.payload["days_ago"].clone()).collect();
        assert_eq!(kept, vec![json!(10)]);

        // Running again removes nothing
        assert_eq!(store.cleanup(RetentionPolicy::default()).unwrap().total(), 0);
    }

    #[test]
    fn test_cleanup_history_cutoff_day_is_removed() {
        let (store, clock) = mock_store();

        store
            .save_historical("Delhi", date!(2023 - 12 - 16), &json!({ "aqi_avg": 80.0 }))
            .unwrap();
        store
            .save_historical("Delhi", date!(2023 - 12 - 17), &json!({ "aqi_avg": 85.0 }))
            .unwrap();

        // 90 days before 2024-03-15T12:00Z is 2023-12-16T12:00Z
        assert_eq!(clock.now(), datetime!(2024-03-15 12:00 UTC));
        let report = store.cleanup(RetentionPolicy::default()).unwrap();
        assert_eq!(report.historical_deleted, 1);

        let left = store.query_historical(&HistoricalQuery::new()).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].date, date!(2023 - 12 - 17));
    }

    #[test]
    fn test_cleanup_with_unbounded_windows_keeps_everything() {
        let (store, clock) = mock_store();
        let now = clock.now();

        clock.set_time(now - Duration::days(3650));
        store.save_reading("Delhi", &json!({ "aqi": 40 })).unwrap();
        clock.set_time(now);
        store
            .save_historical("Delhi", date!(2000 - 01 - 01), &json!({ "aqi_avg": 50.0 }))
            .unwrap();

        let report = store
            .cleanup(RetentionPolicy::new(u32::MAX, u32::MAX))
            .unwrap();
        assert_eq!(report, CleanupReport::default());
        assert_eq!(store.count_readings(None).unwrap(), 1);
        assert_eq!(store.count_historical(None).unwrap(), 1);

        // One bounded window still applies on its own
        let report = store.cleanup(RetentionPolicy::new(u32::MAX, 90)).unwrap();
        assert_eq!(report.readings_deleted, 0);
        assert_eq!(report.historical_deleted, 1);
    }

    #[test]
    fn test_date_helpers() {
        assert_eq!(format_date(date!(2024 - 01 - 05)), "2024-01-05");
        assert_eq!(parse_date("2024-01-05").unwrap(), date!(2024 - 01 - 05));
        assert!(matches!(
            parse_date("05/01/2024"),
            Err(Error::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_millis_roundtrip() {
        let time = datetime!(2024-03-15 12:34:56.789 UTC);
        assert_eq!(from_unix_millis(unix_millis(time)).unwrap(), time);
    }

    #[test]
    fn test_store_location_display() {
        assert_eq!(StoreLocation::InMemory.to_string(), ":memory:");
        assert_eq!(
            StoreLocation::from(PathBuf::from("/tmp/airq.db")).to_string(),
            "/tmp/airq.db"
        );
    }
}
