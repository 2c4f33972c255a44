//! Time source used for capture instants and retention cutoffs.

use std::sync::RwLock;

use time::{Duration, OffsetDateTime};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Manually driven clock for tests and data seeding.
#[derive(Debug)]
pub struct MockClock {
    now: RwLock<OffsetDateTime>,
}

impl Clock for MockClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl MockClock {
    pub fn with_time(time: OffsetDateTime) -> Self {
        Self {
            now: RwLock::new(time),
        }
    }

    pub fn new() -> Self {
        Self::with_time(OffsetDateTime::now_utc())
    }

    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now += duration;
    }

    pub fn set_time(&self, time: OffsetDateTime) {
        *self.now.write().unwrap_or_else(|e| e.into_inner()) = time;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}
