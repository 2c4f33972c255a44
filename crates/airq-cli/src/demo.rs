//! Sample data generation.
//!
//! Produces the same shape and value ranges the dashboard falls back to when
//! the live feed is unreachable, so a fresh store can be charted right away.

use airq_types::{AqiReading, DailyAqi, Pollutants, Weather};
use rand::Rng;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// A plausible current reading for `city`.
pub fn sample_reading<R: Rng + ?Sized>(rng: &mut R, city: &str, now: OffsetDateTime) -> AqiReading {
    AqiReading {
        aqi: Some(rng.random_range(50..300)),
        city: city.to_string(),
        time: now.format(&Rfc3339).unwrap_or_default(),
        pollutants: Pollutants {
            pm25: Some(f64::from(rng.random_range(20u16..170))),
            pm10: Some(f64::from(rng.random_range(30u16..230))),
            o3: Some(f64::from(rng.random_range(10u16..110))),
            no2: Some(f64::from(rng.random_range(15u16..95))),
            so2: Some(f64::from(rng.random_range(5u16..55))),
            co: Some(f64::from(rng.random_range(2u16..32))),
        },
        weather: Weather {
            temperature: Some(f64::from(rng.random_range(10i16..40))),
            humidity: Some(f64::from(rng.random_range(30u16..90))),
            pressure: Some(f64::from(rng.random_range(990u16..1040))),
            wind_speed: Some(round1(rng.random_range(2.0..12.0))),
            wind_gust: Some(round1(rng.random_range(5.0..20.0))),
            dew_point: Some(f64::from(rng.random_range(5i16..25))),
        },
        dominant_pollutant: Some("pm25".to_string()),
    }
}

/// A daily aggregate for the day `days_ago` days before today.
///
/// Values follow a slow sine wave over a random base so consecutive days
/// look related.
pub fn sample_daily<R: Rng + ?Sized>(rng: &mut R, days_ago: u32) -> DailyAqi {
    let base = 50.0 + rng.random::<f64>() * 100.0;
    let variation = (f64::from(days_ago) / 4.0).sin() * 20.0;
    let avg = (base + variation).max(10.0);

    let spread = rng.random_range(0.15..0.35);
    DailyAqi {
        aqi_avg: round1(avg),
        aqi_min: (avg * (1.0 - spread)).round() as u16,
        aqi_max: (avg * (1.0 + spread)).round() as u16,
        dominant_pollutant: Some("pm25".to_string()),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
