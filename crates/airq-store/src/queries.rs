//! Query builders for readings and historical records.
//!
//! Both [`ReadingQuery`] and [`HistoricalQuery`] follow the builder pattern
//! and compile to a single SQL statement that the engine answers from the
//! collection's secondary indexes.
//!
//! # Example
//!
//! ```
//! use airq_store::{HistoricalQuery, ReadingQuery, Store};
//! use time::macros::date;
//!
//! let store = Store::open_in_memory()?;
//!
//! // The ten most recent readings for a city
//! let query = ReadingQuery::new().city("Delhi").limit(10);
//! let readings = store.query_readings(&query)?;
//!
//! // January's daily records, oldest first
//! let january = HistoricalQuery::new()
//!     .city("Delhi")
//!     .from(date!(2024 - 01 - 01))
//!     .to(date!(2024 - 01 - 31));
//! let history = store.query_historical(&january)?;
//! # Ok::<(), airq_store::Error>(())
//! ```

use time::{Date, OffsetDateTime};

use crate::store::{format_date, unix_millis};

type SqlParams = Vec<Box<dyn rusqlite::ToSql>>;

/// Fluent query builder for current readings.
///
/// By default, queries return results ordered by capture instant descending
/// (newest first). Readings sharing a capture instant are ordered by
/// insertion.
#[derive(Debug, Default, Clone)]
pub struct ReadingQuery {
    /// Filter by city.
    pub city: Option<String>,
    /// Filter readings captured at or after this time.
    pub since: Option<OffsetDateTime>,
    /// Filter readings captured at or before this time.
    pub until: Option<OffsetDateTime>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
    /// Order by capture instant descending (newest first).
    pub newest_first: bool,
}

impl ReadingQuery {
    /// Create a new query: all cities, no time range, no limit, newest first.
    pub fn new() -> Self {
        Self {
            newest_first: true,
            ..Default::default()
        }
    }

    /// Only include readings for this city.
    pub fn city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }

    /// Filter to readings captured at or after this time.
    pub fn since(mut self, time: OffsetDateTime) -> Self {
        self.since = Some(time);
        self
    }

    /// Filter to readings captured at or before this time.
    pub fn until(mut self, time: OffsetDateTime) -> Self {
        self.until = Some(time);
        self
    }

    /// Limit the maximum number of results returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first N results.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Order results oldest first.
    pub fn oldest_first(mut self) -> Self {
        self.newest_first = false;
        self
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, SqlParams) {
        let mut conditions = Vec::new();
        let mut params: SqlParams = Vec::new();

        if let Some(ref city) = self.city {
            conditions.push("city = ?");
            params.push(Box::new(city.clone()));
        }

        if let Some(since) = self.since {
            conditions.push("captured_at >= ?");
            params.push(Box::new(unix_millis(since)));
        }

        if let Some(until) = self.until {
            conditions.push("captured_at <= ?");
            params.push(Box::new(unix_millis(until)));
        }

        (where_clause(&conditions), params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();
        let order = if self.newest_first { "DESC" } else { "ASC" };

        let mut sql = format!(
            "SELECT id, city, captured_at, payload FROM readings {} \
             ORDER BY captured_at {order}, seq {order}",
            where_clause
        );
        push_pagination(&mut sql, self.limit, self.offset);
        sql
    }
}

/// Fluent query builder for daily historical records.
///
/// Date bounds are inclusive on both ends. By default, results are ordered
/// by date ascending (oldest first), which is what charts consume.
#[derive(Debug, Default, Clone)]
pub struct HistoricalQuery {
    /// Filter by city.
    pub city: Option<String>,
    /// Include only records dated on or after this date.
    pub from: Option<Date>,
    /// Include only records dated on or before this date.
    pub to: Option<Date>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
    /// Order by date descending.
    pub newest_first: bool,
}

impl HistoricalQuery {
    /// Create a new query: all cities, all dates, no limit, oldest first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only include records for this city.
    pub fn city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }

    /// Include records dated on or after `date`.
    pub fn from(mut self, date: Date) -> Self {
        self.from = Some(date);
        self
    }

    /// Include records dated on or before `date`.
    pub fn to(mut self, date: Date) -> Self {
        self.to = Some(date);
        self
    }

    /// Limit the maximum number of results returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first N results.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Order results newest first.
    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// Build the SQL WHERE clause and parameters.
    ///
    /// Dates are stored as `YYYY-MM-DD`, so lexicographic comparison in SQL
    /// matches calendar order.
    pub(crate) fn build_where(&self) -> (String, SqlParams) {
        let mut conditions = Vec::new();
        let mut params: SqlParams = Vec::new();

        if let Some(ref city) = self.city {
            conditions.push("city = ?");
            params.push(Box::new(city.clone()));
        }

        if let Some(from) = self.from {
            conditions.push("date >= ?");
            params.push(Box::new(format_date(from)));
        }

        if let Some(to) = self.to {
            conditions.push("date <= ?");
            params.push(Box::new(format_date(to)));
        }

        (where_clause(&conditions), params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();
        let order = if self.newest_first { "DESC" } else { "ASC" };

        let mut sql = format!(
            "SELECT id, city, date, synced_at, payload FROM historical {} \
             ORDER BY date {order}, city ASC",
            where_clause
        );
        push_pagination(&mut sql, self.limit, self.offset);
        sql
    }
}

fn where_clause(conditions: &[&str]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

fn push_pagination(sql: &mut String, limit: Option<u32>, offset: Option<u32>) {
    // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
    match (limit, offset) {
        (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
        (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
        (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
        (None, None) => {}
    }
}
