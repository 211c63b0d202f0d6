//! Current-conditions observation supplied by a live weather source.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One live observation for a city.
///
/// Only `temperature` and `timestamp` take part in anomaly classification;
/// the remaining fields are carried through for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveObservation {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    /// Pressure in hPa.
    pub pressure: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Wind speed in m/s.
    pub wind_speed: f64,
    pub description: String,
    pub timestamp: NaiveDateTime,
}

impl LiveObservation {
    /// Observation with only the fields the classifier needs.
    pub fn bare(city: impl Into<String>, temperature: f64, timestamp: NaiveDateTime) -> Self {
        Self {
            city: city.into(),
            temperature,
            feels_like: temperature,
            pressure: f64::NAN,
            humidity: f64::NAN,
            wind_speed: f64::NAN,
            description: String::new(),
            timestamp,
        }
    }
}
