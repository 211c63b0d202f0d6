//! Seasonal baseline construction from a historical batch.

use super::table::{ProfileTable, SeasonalProfile, MIN_PROFILE_READINGS};
use crate::core::{CalendarSeasons, Reading, Season, SeasonResolver};
use crate::stats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Spread estimator for a seasonal group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dispersion {
    /// Sample standard deviation (n - 1 denominator).
    #[default]
    Sample,
    /// Population standard deviation (n denominator).
    Population,
}

impl Dispersion {
    fn std_dev(self, values: &[f64]) -> f64 {
        match self {
            Dispersion::Sample => stats::sample_std_dev(values),
            Dispersion::Population => stats::population_std_dev(values),
        }
    }
}

/// Builds one [`SeasonalProfile`] per (city, season) group.
#[derive(Debug, Clone, Default)]
pub struct SeasonalProfileBuilder<R = CalendarSeasons> {
    resolver: R,
    dispersion: Dispersion,
}

impl SeasonalProfileBuilder {
    /// Builder using the calendar month table and sample standard deviation.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: SeasonResolver> SeasonalProfileBuilder<R> {
    /// Use a different timestamp-to-season mapping.
    pub fn resolver<S: SeasonResolver>(self, resolver: S) -> SeasonalProfileBuilder<S> {
        SeasonalProfileBuilder {
            resolver,
            dispersion: self.dispersion,
        }
    }

    /// Set the spread estimator.
    pub fn dispersion(mut self, dispersion: Dispersion) -> Self {
        self.dispersion = dispersion;
        self
    }

    /// Group readings by (city, season) and compute mean and spread.
    ///
    /// Groups with fewer than two readings yield
    /// [`Baseline::Insufficient`](super::Baseline::Insufficient).
    /// Input order does not matter.
    pub fn build(&self, readings: &[Reading]) -> ProfileTable {
        let mut groups: BTreeMap<(&str, Season), Vec<f64>> = BTreeMap::new();
        for r in readings {
            let season = self.resolver.season_of(&r.timestamp);
            groups
                .entry((r.city.as_str(), season))
                .or_default()
                .push(r.temperature);
        }

        let mut keyed: BTreeMap<String, BTreeMap<Season, SeasonalProfile>> = BTreeMap::new();
        let mut insufficient = 0usize;
        for ((city, season), temps) in groups {
            let profile = if temps.len() < MIN_PROFILE_READINGS {
                insufficient += 1;
                SeasonalProfile::insufficient(city, season, temps.len())
            } else {
                SeasonalProfile::established(
                    city,
                    season,
                    stats::mean(&temps),
                    self.dispersion.std_dev(&temps),
                    temps.len(),
                )
            };
            keyed
                .entry(city.to_string())
                .or_default()
                .insert(season, profile);
        }
        let table = ProfileTable::from_keyed(keyed);

        debug!(
            readings = readings.len(),
            profiles = table.len(),
            insufficient,
            dispersion = ?self.dispersion,
            "built seasonal profiles"
        );
        table
    }
}

/// Build profiles with the given season mapping and sample standard deviation.
pub fn build_profiles<R: SeasonResolver>(readings: &[Reading], season_of: R) -> ProfileTable {
    SeasonalProfileBuilder::new().resolver(season_of).build(readings)
}
