//! Data models for stored data.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::error::{OperationContext, Result};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// A current reading stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReading {
    /// Record identity, `{city}_{captured_at_millis}` with an optional
    /// `_{n}` suffix when two readings share a millisecond.
    pub id: String,
    /// City the reading belongs to.
    pub city: String,
    /// When the store captured this reading.
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
    /// Reading payload as supplied by the caller.
    pub payload: serde_json::Value,
}

impl StoredReading {
    /// Decode the payload into a concrete type.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.payload.clone()).during("decode_reading")
    }
}

/// A daily historical record stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredHistoricalRecord {
    /// Record identity, `{city}_{date}`.
    pub id: String,
    /// City the record belongs to.
    pub city: String,
    /// Calendar date the aggregate covers.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// When this record was last written.
    #[serde(with = "time::serde::rfc3339")]
    pub synced_at: OffsetDateTime,
    /// Aggregate payload as supplied by the caller.
    pub payload: serde_json::Value,
}

impl StoredHistoricalRecord {
    /// Decode the payload into a concrete type.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.payload.clone()).during("decode_historical")
    }
}

/// A stored preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    pub key: String,
    pub value: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A favorite city.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Favorite {
    /// City name.
    pub city: String,
    /// When the city was (last) added.
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
}

/// How long each collection keeps its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    /// Readings captured more than this many days ago are deleted.
    pub reading_days: u32,
    /// Historical records dated more than this many days ago are deleted.
    pub history_days: u32,
}

impl RetentionPolicy {
    /// Readings are kept for 30 days.
    pub const DEFAULT_READING_DAYS: u32 = 30;
    /// History is kept for 90 days.
    pub const DEFAULT_HISTORY_DAYS: u32 = 90;

    pub fn new(reading_days: u32, history_days: u32) -> Self {
        Self {
            reading_days,
            history_days,
        }
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_READING_DAYS, Self::DEFAULT_HISTORY_DAYS)
    }
}

/// Outcome of a retention cleanup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Number of readings deleted.
    pub readings_deleted: usize,
    /// Number of historical records deleted.
    pub historical_deleted: usize,
}

impl CleanupReport {
    /// Total records deleted across both collections.
    pub fn total(&self) -> usize {
        self.readings_deleted + self.historical_deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::{date, datetime};

    #[test]
    fn test_reading_payload_as() {
        #[derive(Deserialize)]
        struct Snapshot {
            aqi: u16,
        }

        let reading = StoredReading {
            id: "Delhi_1704067200000".to_string(),
            city: "Delhi".to_string(),
            captured_at: datetime!(2024-01-01 00:00:00 UTC),
            payload: json!({ "aqi": 182, "dominant": "pm25" }),
        };

        let snapshot: Snapshot = reading.payload_as().unwrap();
        assert_eq!(snapshot.aqi, 182);
    }

    #[test]
    fn test_reading_payload_as_wrong_shape() {
        let reading = StoredReading {
            id: "x".to_string(),
            city: "x".to_string(),
            captured_at: datetime!(2024-01-01 00:00:00 UTC),
            payload: json!("not an object"),
        };

        let result: Result<airq_types::AqiReading> = reading.payload_as();
        assert!(matches!(
            result,
            Err(crate::Error::Serialization {
                operation: "decode_reading",
                ..
            })
        ));
    }

    #[test]
    fn test_historical_serializes_iso_date() {
        let record = StoredHistoricalRecord {
            id: "Delhi_2024-01-05".to_string(),
            city: "Delhi".to_string(),
            date: date!(2024 - 01 - 05),
            synced_at: datetime!(2024-01-06 03:00:00 UTC),
            payload: json!({ "aqi_avg": 120.0 }),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["date"], "2024-01-05");
        assert_eq!(value["synced_at"], "2024-01-06T03:00:00Z");
    }

    #[test]
    fn test_retention_policy_defaults() {
        let policy = RetentionPolicy::default();
        assert_eq!(policy.reading_days, 30);
        assert_eq!(policy.history_days, 90);

        let partial: RetentionPolicy = serde_json::from_str(r#"{"reading_days":7}"#).unwrap();
        assert_eq!(partial, RetentionPolicy::new(7, 90));
    }

    #[test]
    fn test_cleanup_report_total() {
        let report = CleanupReport {
            readings_deleted: 3,
            historical_deleted: 4,
        };
        assert_eq!(report.total(), 7);
    }
}
