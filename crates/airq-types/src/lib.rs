//! Platform-agnostic types for air-quality index (AQI) data.
//!
//! This crate provides shared types used by the local store and the
//! front ends that render or persist AQI readings.
//!
//! # Features
//!
//! - AQI categories with labels and health guidance
//! - Reading and daily-aggregate payloads
//! - Validated alert threshold and theme preferences
//! - Cleanup of sensor-error values reported by stations
//!
//! # Example
//!
//! ```
//! use airq_types::{AqiLevel, AqiThreshold};
//!
//! let level = AqiLevel::from_aqi(162);
//! assert_eq!(level, AqiLevel::Unhealthy);
//! assert!(162 > AqiThreshold::default().value());
//! ```

pub mod error;
pub mod types;
pub mod validation;

pub use error::{ParseError, ParseResult};
pub use types::{AqiLevel, AqiReading, AqiThreshold, DailyAqi, Pollutants, Theme, Weather, keys};

#[cfg(test)]
mod tests {
    use super::*;

    // --- AqiLevel tests ---

    #[test]
    fn test_level_boundaries() {
        assert_eq!(AqiLevel::from_aqi(0), AqiLevel::Good);
        assert_eq!(AqiLevel::from_aqi(50), AqiLevel::Good);
        assert_eq!(AqiLevel::from_aqi(51), AqiLevel::Moderate);
        assert_eq!(AqiLevel::from_aqi(100), AqiLevel::Moderate);
        assert_eq!(AqiLevel::from_aqi(101), AqiLevel::UnhealthySensitive);
        assert_eq!(AqiLevel::from_aqi(150), AqiLevel::UnhealthySensitive);
        assert_eq!(AqiLevel::from_aqi(151), AqiLevel::Unhealthy);
        assert_eq!(AqiLevel::from_aqi(200), AqiLevel::Unhealthy);
        assert_eq!(AqiLevel::from_aqi(201), AqiLevel::VeryUnhealthy);
        assert_eq!(AqiLevel::from_aqi(300), AqiLevel::VeryUnhealthy);
        assert_eq!(AqiLevel::from_aqi(301), AqiLevel::Hazardous);
        assert_eq!(AqiLevel::from_aqi(u16::MAX), AqiLevel::Hazardous);
    }

    #[test]
    fn test_level_ranges_are_contiguous() {
        let mut expected_min = 0;
        for level in AqiLevel::ALL {
            let (min, max) = level.range();
            assert_eq!(min, expected_min, "{level:?} starts at the wrong value");
            match max {
                Some(max) => expected_min = max + 1,
                None => assert_eq!(level, AqiLevel::Hazardous),
            }
        }
    }

    #[test]
    fn test_level_ordering() {
        assert!(AqiLevel::Good < AqiLevel::Moderate);
        assert!(AqiLevel::VeryUnhealthy < AqiLevel::Hazardous);
    }

    #[test]
    fn test_level_css_class() {
        assert_eq!(AqiLevel::UnhealthySensitive.css_class(), "unhealthy-sensitive");
        assert_eq!(AqiLevel::VeryUnhealthy.css_class(), "very-unhealthy");
    }

    #[test]
    fn test_every_level_has_recommendations() {
        for level in AqiLevel::ALL {
            assert!(!level.recommendations().is_empty());
        }
    }

    #[test]
    fn test_level_serialization() {
        assert_eq!(
            serde_json::to_string(&AqiLevel::UnhealthySensitive).unwrap(),
            "\"unhealthy_sensitive\""
        );
    }

    // --- AqiReading tests ---

    #[test]
    fn test_reading_level_and_threshold() {
        let reading = AqiReading {
            aqi: Some(151),
            city: "Delhi".to_string(),
            time: "2024-01-01 09:00:00".to_string(),
            pollutants: Pollutants::default(),
            weather: Weather::default(),
            dominant_pollutant: None,
        };

        assert_eq!(reading.level(), Some(AqiLevel::Unhealthy));
        assert!(reading.exceeds(AqiThreshold::default()));
        assert!(!reading.exceeds(AqiThreshold::new(151).unwrap()));
    }

    #[test]
    fn test_reading_without_aqi() {
        let reading = AqiReading {
            aqi: None,
            city: "Delhi".to_string(),
            time: String::new(),
            pollutants: Pollutants::default(),
            weather: Weather::default(),
            dominant_pollutant: None,
        };

        assert!(reading.level().is_none());
        assert!(!reading.exceeds(AqiThreshold::new(0).unwrap()));
    }

    #[test]
    fn test_reading_deserialization_with_missing_sections() {
        let json = r#"{"aqi":42,"city":"Mumbai","time":"2024-02-02 12:00:00"}"#;
        let reading: AqiReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.aqi, Some(42));
        assert_eq!(reading.pollutants, Pollutants::default());
        assert!(reading.dominant_pollutant.is_none());
    }

    #[test]
    fn test_daily_peak_level() {
        let day = DailyAqi {
            aqi_avg: 88.5,
            aqi_min: 40,
            aqi_max: 205,
            dominant_pollutant: Some("pm10".to_string()),
        };
        assert_eq!(day.peak_level(), AqiLevel::VeryUnhealthy);
    }

    // --- AqiThreshold tests ---

    #[test]
    fn test_threshold_bounds() {
        assert!(AqiThreshold::new(0).is_ok());
        assert!(AqiThreshold::new(500).is_ok());
        assert_eq!(
            AqiThreshold::new(-1),
            Err(ParseError::InvalidThreshold { value: -1, max: 500 })
        );
        assert!(AqiThreshold::new(501).is_err());
    }

    #[test]
    fn test_threshold_from_str() {
        assert_eq!("120".parse::<AqiThreshold>().unwrap().value(), 120);
        assert_eq!(" 75 ".parse::<AqiThreshold>().unwrap().value(), 75);
        assert!(matches!(
            "abc".parse::<AqiThreshold>(),
            Err(ParseError::NotANumber(_))
        ));
    }

    #[test]
    fn test_threshold_serde_is_plain_number() {
        let threshold = AqiThreshold::new(150).unwrap();
        assert_eq!(serde_json::to_string(&threshold).unwrap(), "150");
        let parsed: AqiThreshold = serde_json::from_str("99").unwrap();
        assert_eq!(parsed.value(), 99);
        assert!(serde_json::from_str::<AqiThreshold>("900").is_err());
    }

    // --- Theme tests ---

    #[test]
    fn test_theme_parse_and_display() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Light.to_string(), "light");
        assert!(matches!(
            "sepia".parse::<Theme>(),
            Err(ParseError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// A value always falls inside the range of the level it maps to.
        #[test]
        fn level_range_contains_value(aqi: u16) {
            let (min, max) = AqiLevel::from_aqi(aqi).range();
            prop_assert!(aqi >= min);
            prop_assert!(max.is_none_or(|max| aqi <= max));
        }

        /// Higher AQI never maps to a less severe level.
        #[test]
        fn level_is_monotonic(a: u16, b: u16) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(AqiLevel::from_aqi(lo) <= AqiLevel::from_aqi(hi));
        }

        /// Thresholds inside the scale always validate.
        #[test]
        fn threshold_accepts_scale(value in 0i64..=500) {
            prop_assert_eq!(AqiThreshold::new(value).unwrap().value() as i64, value);
        }
    }
}
