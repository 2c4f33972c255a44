//! Core types for air-quality data.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// AQI category on the US EPA scale.
///
/// # Ordering
///
/// Levels are ordered by severity, so threshold comparisons read naturally:
///
/// ```
/// use airq_types::AqiLevel;
///
/// assert!(AqiLevel::Hazardous > AqiLevel::Unhealthy);
/// assert_eq!(AqiLevel::from_aqi(42), AqiLevel::Good);
/// assert_eq!(format!("{}", AqiLevel::UnhealthySensitive), "Unhealthy for Sensitive Groups");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AqiLevel {
    /// 0-50.
    Good,
    /// 51-100.
    Moderate,
    /// 101-150.
    UnhealthySensitive,
    /// 151-200.
    Unhealthy,
    /// 201-300.
    VeryUnhealthy,
    /// Above 300.
    Hazardous,
}

impl AqiLevel {
    /// All levels from least to most severe.
    pub const ALL: [AqiLevel; 6] = [
        AqiLevel::Good,
        AqiLevel::Moderate,
        AqiLevel::UnhealthySensitive,
        AqiLevel::Unhealthy,
        AqiLevel::VeryUnhealthy,
        AqiLevel::Hazardous,
    ];

    /// Categorize an AQI value.
    #[must_use]
    pub fn from_aqi(aqi: u16) -> Self {
        match aqi {
            0..=50 => AqiLevel::Good,
            51..=100 => AqiLevel::Moderate,
            101..=150 => AqiLevel::UnhealthySensitive,
            151..=200 => AqiLevel::Unhealthy,
            201..=300 => AqiLevel::VeryUnhealthy,
            _ => AqiLevel::Hazardous,
        }
    }

    /// Inclusive AQI bounds of this level. `Hazardous` has no upper bound.
    #[must_use]
    pub fn range(&self) -> (u16, Option<u16>) {
        match self {
            AqiLevel::Good => (0, Some(50)),
            AqiLevel::Moderate => (51, Some(100)),
            AqiLevel::UnhealthySensitive => (101, Some(150)),
            AqiLevel::Unhealthy => (151, Some(200)),
            AqiLevel::VeryUnhealthy => (201, Some(300)),
            AqiLevel::Hazardous => (301, None),
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            AqiLevel::Unhealthy => "Unhealthy",
            AqiLevel::VeryUnhealthy => "Very Unhealthy",
            AqiLevel::Hazardous => "Hazardous",
        }
    }

    /// Kebab-case class name used by dashboards for band colors.
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self {
            AqiLevel::Good => "good",
            AqiLevel::Moderate => "moderate",
            AqiLevel::UnhealthySensitive => "unhealthy-sensitive",
            AqiLevel::Unhealthy => "unhealthy",
            AqiLevel::VeryUnhealthy => "very-unhealthy",
            AqiLevel::Hazardous => "hazardous",
        }
    }

    /// Health guidance for this level, most important first.
    #[must_use]
    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            AqiLevel::Good => &[
                "Air quality is satisfactory - enjoy outdoor activities",
                "Open windows to let in fresh air",
            ],
            AqiLevel::Moderate => &[
                "Air quality acceptable for most people",
                "Unusually sensitive individuals should limit prolonged outdoor exertion",
            ],
            AqiLevel::UnhealthySensitive => &[
                "Sensitive groups should reduce prolonged outdoor exertion",
                "Close windows to avoid outdoor air coming indoors",
                "People with respiratory conditions should stay indoors",
            ],
            AqiLevel::Unhealthy => &[
                "Everyone should reduce prolonged outdoor exertion",
                "Keep windows and doors closed",
                "Wear N95 masks if you must go outside",
            ],
            AqiLevel::VeryUnhealthy => &[
                "Everyone should avoid all outdoor exertion",
                "Run air purifiers at maximum setting",
                "Keep emergency medications handy",
            ],
            AqiLevel::Hazardous => &[
                "Health alert: everyone may experience serious health effects",
                "Remain indoors and avoid all physical activities",
                "Seek medical attention if symptoms appear",
            ],
        }
    }
}

impl fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pollutant concentrations reported alongside the AQI.
///
/// Every field is optional: feeds omit pollutants a station does not measure.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pollutants {
    /// PM2.5.
    pub pm25: Option<f64>,
    /// PM10.
    pub pm10: Option<f64>,
    /// Ozone.
    pub o3: Option<f64>,
    /// Nitrogen dioxide.
    pub no2: Option<f64>,
    /// Sulphur dioxide.
    pub so2: Option<f64>,
    /// Carbon monoxide.
    pub co: Option<f64>,
}

impl Pollutants {
    /// Iterate over `(name, value)` for every reported pollutant.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        [
            ("pm25", self.pm25),
            ("pm10", self.pm10),
            ("o3", self.o3),
            ("no2", self.no2),
            ("so2", self.so2),
            ("co", self.co),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

/// Weather conditions at the monitoring station.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Weather {
    /// Temperature in degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity percentage.
    pub humidity: Option<f64>,
    /// Atmospheric pressure in hPa.
    pub pressure: Option<f64>,
    /// Wind speed in m/s.
    pub wind_speed: Option<f64>,
    /// Wind gust in m/s.
    pub wind_gust: Option<f64>,
    /// Dew point in degrees Celsius.
    pub dew_point: Option<f64>,
}

/// A current AQI snapshot for a city.
///
/// This is the payload the dashboard persists for each fetch. The store
/// treats it as opaque JSON.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AqiReading {
    /// Overall AQI, `None` when the station reported no usable value.
    pub aqi: Option<u16>,
    /// City name as reported by the feed.
    pub city: String,
    /// Observation time as reported by the feed.
    pub time: String,
    /// Pollutant concentrations.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pollutants: Pollutants,
    /// Weather conditions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub weather: Weather,
    /// Dominant pollutant key (e.g. `pm25`).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub dominant_pollutant: Option<String>,
}

impl AqiReading {
    /// AQI category, if the reading has an AQI.
    #[must_use]
    pub fn level(&self) -> Option<AqiLevel> {
        self.aqi.map(AqiLevel::from_aqi)
    }

    /// Whether the AQI is strictly above the alert threshold.
    #[must_use]
    pub fn exceeds(&self, threshold: AqiThreshold) -> bool {
        self.aqi.is_some_and(|aqi| aqi > threshold.value())
    }
}

/// Daily aggregate stored once per city and calendar date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DailyAqi {
    /// Mean AQI over the day.
    pub aqi_avg: f64,
    /// Lowest AQI observed.
    pub aqi_min: u16,
    /// Highest AQI observed.
    pub aqi_max: u16,
    /// Pollutant that dominated the day.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub dominant_pollutant: Option<String>,
}

impl DailyAqi {
    /// Category of the day's worst hour.
    #[must_use]
    pub fn peak_level(&self) -> AqiLevel {
        AqiLevel::from_aqi(self.aqi_max)
    }
}

/// AQI value above which the dashboard raises an alert.
///
/// ```
/// use airq_types::AqiThreshold;
///
/// assert_eq!(AqiThreshold::default().value(), 150);
/// assert!(AqiThreshold::new(501).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i64", into = "u16"))]
pub struct AqiThreshold(u16);

impl AqiThreshold {
    /// Largest accepted threshold.
    pub const MAX: u16 = 500;

    /// Default threshold (start of "Unhealthy").
    pub const DEFAULT: AqiThreshold = AqiThreshold(150);

    /// Validate and wrap a threshold.
    pub fn new(value: i64) -> Result<Self, ParseError> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u16))
        } else {
            Err(ParseError::InvalidThreshold {
                value,
                max: Self::MAX,
            })
        }
    }

    /// The raw AQI value.
    #[must_use]
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl Default for AqiThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for AqiThreshold {
    type Error = ParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AqiThreshold> for u16 {
    fn from(threshold: AqiThreshold) -> Self {
        threshold.0
    }
}

impl FromStr for AqiThreshold {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| ParseError::NotANumber(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for AqiThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dashboard color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Theme {
    /// Dark background (default).
    #[default]
    Dark,
    /// Light background.
    Light,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(ParseError::UnknownTheme(other.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

/// Preference keys shared by every front end.
pub mod keys {
    /// Alert threshold ([`AqiThreshold`](crate::AqiThreshold)).
    pub const AQI_THRESHOLD: &str = "aqiThreshold";
    /// Color theme ([`Theme`](crate::Theme)).
    pub const THEME: &str = "theme";
    /// Last selected city.
    pub const SELECTED_CITY: &str = "selectedCity";
}
