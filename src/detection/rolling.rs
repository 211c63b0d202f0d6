//! Rolling moving average with season-aware anomaly flags.

use crate::core::{CalendarSeasons, Reading, ReadingBatch, Season, SeasonResolver};
use crate::error::{ClimateError, Result};
use crate::profile::ProfileTable;
use crate::transform::trailing_mean;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Configuration for rolling anomaly detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingConfig {
    /// Trailing window length in readings.
    pub window: usize,
    /// Anomaly threshold in standard deviations.
    pub k: f64,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            window: 30,
            k: 2.0,
        }
    }
}

impl RollingConfig {
    /// Set window length.
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the standard-deviation multiplier.
    pub fn k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(ClimateError::InvalidParameter(
                "window must be positive".to_string(),
            ));
        }
        if !self.k.is_finite() || self.k < 0.0 {
            return Err(ClimateError::InvalidParameter(format!(
                "k must be a non-negative finite number, got {}",
                self.k
            )));
        }
        Ok(())
    }
}

/// A reading with its moving average and anomaly flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedReading {
    #[serde(flatten)]
    pub reading: Reading,
    pub season: Season,
    pub moving_average: f64,
    pub is_anomaly: bool,
}

/// Flags readings that stray more than `k` standard deviations from their
/// seasonal mean.
#[derive(Debug, Clone)]
pub struct RollingAnomalyDetector<R = CalendarSeasons> {
    config: RollingConfig,
    resolver: R,
}

impl RollingAnomalyDetector {
    pub fn new(config: RollingConfig) -> Self {
        Self {
            config,
            resolver: CalendarSeasons,
        }
    }
}

impl<R: SeasonResolver> RollingAnomalyDetector<R> {
    /// Use a different timestamp-to-season mapping.
    pub fn resolver<S: SeasonResolver>(self, resolver: S) -> RollingAnomalyDetector<S> {
        RollingAnomalyDetector {
            config: self.config,
            resolver,
        }
    }

    pub fn config(&self) -> &RollingConfig {
        &self.config
    }

    /// Annotate one city's readings.
    ///
    /// Readings are stably sorted by timestamp first. A reading whose
    /// seasonal profile is insufficient is never flagged; a missing profile
    /// is an error.
    pub fn detect(
        &self,
        city_readings: &[Reading],
        profiles: &ProfileTable,
    ) -> Result<Vec<AnnotatedReading>> {
        self.config.validate()?;

        let Some(first) = city_readings.first() else {
            return Ok(Vec::new());
        };
        if let Some(other) = city_readings.iter().find(|r| r.city != first.city) {
            return Err(ClimateError::InvalidParameter(format!(
                "detect expects a single city, got '{}' and '{}'",
                first.city, other.city
            )));
        }

        let mut sorted = city_readings.to_vec();
        sorted.sort_by_key(|r| r.timestamp);

        let temps: Vec<f64> = sorted.iter().map(|r| r.temperature).collect();
        let moving = trailing_mean(&temps, self.config.window);

        let mut annotated = Vec::with_capacity(sorted.len());
        for (reading, moving_average) in sorted.into_iter().zip(moving) {
            let season = self.resolver.season_of(&reading.timestamp);
            let profile = profiles.lookup(&reading.city, season)?;
            let is_anomaly = match profile.stats() {
                Some((mean, std_dev)) => {
                    (reading.temperature - mean).abs() > self.config.k * std_dev
                }
                None => false,
            };
            annotated.push(AnnotatedReading {
                reading,
                season,
                moving_average,
                is_anomaly,
            });
        }

        debug!(
            city = %first.city,
            readings = annotated.len(),
            anomalies = annotated.iter().filter(|a| a.is_anomaly).count(),
            window = self.config.window,
            "rolling anomaly detection"
        );
        Ok(annotated)
    }

    /// Annotate every city in a batch independently.
    pub fn detect_all(
        &self,
        batch: &ReadingBatch,
        profiles: &ProfileTable,
    ) -> Result<BTreeMap<String, Vec<AnnotatedReading>>> {
        let mut out = BTreeMap::new();
        for (city, readings) in batch.by_city() {
            let owned: Vec<Reading> = readings.into_iter().cloned().collect();
            out.insert(city.to_string(), self.detect(&owned, profiles)?);
        }
        Ok(out)
    }
}

/// Readings dated within `[start, end]`, inclusive.
///
/// `annotated` must be in timestamp order, as returned by
/// [`RollingAnomalyDetector::detect`].
pub fn filter_range(
    annotated: &[AnnotatedReading],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<&[AnnotatedReading]> {
    if start > end {
        return Err(ClimateError::InvalidParameter(format!(
            "range start {} is after end {}",
            start, end
        )));
    }
    let lo = annotated.partition_point(|a| a.reading.timestamp.date() < start);
    let hi = annotated.partition_point(|a| a.reading.timestamp.date() <= end);
    Ok(&annotated[lo..hi.max(lo)])
}
