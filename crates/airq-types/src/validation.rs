//! Cleanup of feed values before they are displayed or persisted.
//!
//! Monitoring stations report `999` when a sensor is faulty, and some
//! stations emit temperatures that are physically implausible. These values
//! are dropped rather than shown.
//!
//! # Example
//!
//! ```
//! use airq_types::{AqiReading, Pollutants};
//!
//! let reading = AqiReading {
//!     aqi: Some(999),
//!     city: "Delhi".to_string(),
//!     time: "2024-01-01 10:00:00".to_string(),
//!     pollutants: Pollutants { pm25: Some(180.0), pm10: Some(999.0), ..Default::default() },
//!     weather: Default::default(),
//!     dominant_pollutant: None,
//! };
//!
//! let clean = reading.sanitized();
//! assert_eq!(clean.aqi, Some(180));
//! assert_eq!(clean.pollutants.pm10, None);
//! ```

use crate::types::{AqiReading, Pollutants, Weather};

/// Value a station reports for a faulty sensor.
pub const SENSOR_ERROR_SENTINEL: f64 = 999.0;

/// Lowest plausible station temperature in degrees Celsius.
pub const MIN_TEMPERATURE_C: f64 = -50.0;

/// Highest plausible station temperature in degrees Celsius.
pub const MAX_TEMPERATURE_C: f64 = 60.0;

fn drop_sentinel(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != SENSOR_ERROR_SENTINEL)
}

impl Pollutants {
    /// Copy with every sensor-error sentinel removed.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            pm25: drop_sentinel(self.pm25),
            pm10: drop_sentinel(self.pm10),
            o3: drop_sentinel(self.o3),
            no2: drop_sentinel(self.no2),
            so2: drop_sentinel(self.so2),
            co: drop_sentinel(self.co),
        }
    }

    /// AQI estimate when the station did not report one: PM2.5 if present,
    /// otherwise the largest reported pollutant.
    #[must_use]
    pub fn fallback_aqi(&self) -> Option<u16> {
        self.pm25
            .or_else(|| self.iter().map(|(_, v)| v).reduce(f64::max))
            .map(|v| v.round().clamp(0.0, f64::from(u16::MAX)) as u16)
    }
}

impl Weather {
    /// Copy with implausible temperatures removed.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            temperature: self
                .temperature
                .filter(|t| (MIN_TEMPERATURE_C..=MAX_TEMPERATURE_C).contains(t)),
            ..*self
        }
    }
}

impl AqiReading {
    /// Copy with sensor-error values removed and the AQI recomputed when the
    /// station reported the sentinel.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let pollutants = self.pollutants.sanitized();
        let aqi = match self.aqi {
            Some(aqi) if f64::from(aqi) == SENSOR_ERROR_SENTINEL => pollutants.fallback_aqi(),
            other => other,
        };

        Self {
            aqi,
            city: self.city.clone(),
            time: self.time.clone(),
            pollutants,
            weather: self.weather.sanitized(),
            dominant_pollutant: self.dominant_pollutant.clone(),
        }
    }
}
