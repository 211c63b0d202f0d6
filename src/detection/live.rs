//! Classification of a single live reading against its seasonal baseline.

use crate::core::{LiveObservation, Season};
use crate::error::{ClimateError, Result};
use crate::profile::{ProfileTable, SeasonalProfile, MIN_PROFILE_READINGS};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Default width of the normal band, in standard deviations.
pub const DEFAULT_SIGMA: f64 = 2.0;

/// Verdict for a live reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyCategory {
    High,
    Low,
    Normal,
}

impl AnomalyCategory {
    /// Human-readable verdict.
    pub fn describe(&self) -> &'static str {
        match self {
            AnomalyCategory::High => "abnormally high temperature",
            AnomalyCategory::Low => "abnormally low temperature",
            AnomalyCategory::Normal => "temperature within normal range",
        }
    }

    pub fn is_anomalous(&self) -> bool {
        !matches!(self, AnomalyCategory::Normal)
    }
}

impl fmt::Display for AnomalyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnomalyCategory::High => "high",
            AnomalyCategory::Low => "low",
            AnomalyCategory::Normal => "normal",
        })
    }
}

/// Normal band `[low, high]` around a seasonal mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalyBounds {
    pub low: f64,
    pub high: f64,
}

impl AnomalyBounds {
    fn categorize(&self, temperature: f64) -> AnomalyCategory {
        if temperature > self.high {
            AnomalyCategory::High
        } else if temperature < self.low {
            AnomalyCategory::Low
        } else {
            AnomalyCategory::Normal
        }
    }
}

/// Outcome of classifying one live reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub category: AnomalyCategory,
    pub bounds: AnomalyBounds,
    pub baseline: SeasonalProfile,
    pub temperature: f64,
}

impl Classification {
    pub fn season(&self) -> Season {
        self.baseline.season
    }
}

/// Classifies live readings against a profile table.
///
/// The season always comes from the fixed calendar month table.
#[derive(Debug, Clone, Copy)]
pub struct LiveAnomalyClassifier<'a> {
    profiles: &'a ProfileTable,
    sigma: f64,
}

impl<'a> LiveAnomalyClassifier<'a> {
    pub fn new(profiles: &'a ProfileTable) -> Self {
        Self {
            profiles,
            sigma: DEFAULT_SIGMA,
        }
    }

    /// Set the band width in standard deviations.
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Classify `temperature` observed in `city` at `at`.
    ///
    /// # Errors
    /// * [`ClimateError::ProfileNotFound`] if no baseline exists for the
    ///   city in the season of `at`
    /// * [`ClimateError::InsufficientData`] if that baseline has too few readings
    /// * [`ClimateError::InvalidParameter`] for a non-finite temperature or sigma
    pub fn classify(
        &self,
        city: &str,
        temperature: f64,
        at: NaiveDateTime,
    ) -> Result<Classification> {
        if !temperature.is_finite() {
            return Err(ClimateError::InvalidParameter(format!(
                "temperature must be finite, got {}",
                temperature
            )));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(ClimateError::InvalidParameter(format!(
                "sigma must be a non-negative finite number, got {}",
                self.sigma
            )));
        }

        let season = Season::of(&at);
        let profile = self.profiles.lookup(city, season)?;
        let (low, high) = profile
            .bounds(self.sigma)
            .ok_or(ClimateError::InsufficientData {
                needed: MIN_PROFILE_READINGS,
                got: profile.count(),
            })?;
        let bounds = AnomalyBounds { low, high };

        Ok(Classification {
            category: bounds.categorize(temperature),
            bounds,
            baseline: profile.clone(),
            temperature,
        })
    }

    /// Classify a live observation; only its temperature and timestamp are used.
    pub fn classify_observation(&self, observation: &LiveObservation) -> Result<Classification> {
        self.classify(
            &observation.city,
            observation.temperature,
            observation.timestamp,
        )
    }
}

/// Classify with the default two-sigma band.
pub fn classify(
    city: &str,
    temperature: f64,
    at: NaiveDateTime,
    profiles: &ProfileTable,
) -> Result<Classification> {
    LiveAnomalyClassifier::new(profiles).classify(city, temperature, at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileRow;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn at(m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, m, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn table() -> ProfileTable {
        ProfileTable::from_rows(&[
            ProfileRow {
                city: "Berlin".to_string(),
                season: Season::Summer,
                mean: 10.0,
                std_dev: 5.0,
                count: 92,
            },
            ProfileRow {
                city: "Berlin".to_string(),
                season: Season::Winter,
                mean: 0.0,
                std_dev: f64::NAN,
                count: 1,
            },
        ])
        .unwrap()
    }

    #[test]
    fn high_low_normal() {
        let t = table();
        assert_eq!(
            classify("Berlin", 25.0, at(7), &t).unwrap().category,
            AnomalyCategory::High
        );
        assert_eq!(
            classify("Berlin", -2.0, at(7), &t).unwrap().category,
            AnomalyCategory::Low
        );
        assert_eq!(
            classify("Berlin", 12.0, at(7), &t).unwrap().category,
            AnomalyCategory::Normal
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let t = table();
        assert_eq!(
            classify("Berlin", 20.0, at(7), &t).unwrap().category,
            AnomalyCategory::Normal
        );
        assert_eq!(
            classify("Berlin", 0.0, at(7), &t).unwrap().category,
            AnomalyCategory::Normal
        );
    }

    #[test]
    fn reports_bounds_and_baseline() {
        let t = table();
        let c = classify("Berlin", 12.0, at(6), &t).unwrap();
        assert_relative_eq!(c.bounds.low, 0.0);
        assert_relative_eq!(c.bounds.high, 20.0);
        assert_eq!(c.season(), Season::Summer);
        assert_eq!(c.baseline.mean(), Some(10.0));
        assert_relative_eq!(c.temperature, 12.0);
    }

    #[test]
    fn missing_profile_is_surfaced() {
        let t = table();
        assert_eq!(
            classify("Berlin", 12.0, at(4), &t),
            Err(ClimateError::ProfileNotFound {
                city: "Berlin".to_string(),
                season: Season::Spring,
            })
        );
        assert!(matches!(
            classify("Madrid", 12.0, at(7), &t),
            Err(ClimateError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn insufficient_profile_is_surfaced() {
        let t = table();
        assert_eq!(
            classify("Berlin", 1.0, at(1), &t),
            Err(ClimateError::InsufficientData { needed: 2, got: 1 })
        );
    }

    #[test]
    fn custom_sigma_widens_band() {
        let t = table();
        let c = LiveAnomalyClassifier::new(&t)
            .sigma(3.0)
            .classify("Berlin", 24.0, at(8))
            .unwrap();
        assert_eq!(c.category, AnomalyCategory::Normal);
        assert_relative_eq!(c.bounds.high, 25.0);
    }

    #[test]
    fn classifies_observation() {
        let t = table();
        let mut obs = LiveObservation::bare("Berlin", 30.0, at(7));
        obs.humidity = 40.0;
        obs.description = "clear sky".to_string();
        let c = LiveAnomalyClassifier::new(&t)
            .classify_observation(&obs)
            .unwrap();
        assert_eq!(c.category, AnomalyCategory::High);
        assert!(c.category.is_anomalous());
        assert_eq!(c.category.describe(), "abnormally high temperature");
    }

    #[test]
    fn rejects_non_finite_temperature() {
        let t = table();
        assert!(matches!(
            classify("Berlin", f64::NAN, at(7), &t),
            Err(ClimateError::InvalidParameter(_))
        ));
    }

    #[test]
    fn category_display() {
        assert_eq!(AnomalyCategory::High.to_string(), "high");
        assert_eq!(AnomalyCategory::Low.to_string(), "low");
        assert_eq!(AnomalyCategory::Normal.to_string(), "normal");
    }
}
