//! Seasonal profiles and the keyed profile table.

use crate::core::Season;
use crate::error::{ClimateError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum readings for a (city, season) group to get a concrete baseline.
pub const MIN_PROFILE_READINGS: usize = 2;

/// Baseline statistics for one (city, season) group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Baseline {
    /// Enough readings for a meaningful spread.
    Established { mean: f64, std_dev: f64, count: usize },
    /// Too few readings; no spread can be estimated.
    Insufficient { count: usize },
}

/// Temperature baseline of one city in one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalProfile {
    pub city: String,
    pub season: Season,
    pub baseline: Baseline,
}

impl SeasonalProfile {
    pub fn established(
        city: impl Into<String>,
        season: Season,
        mean: f64,
        std_dev: f64,
        count: usize,
    ) -> Self {
        Self {
            city: city.into(),
            season,
            baseline: Baseline::Established {
                mean,
                std_dev,
                count,
            },
        }
    }

    pub fn insufficient(city: impl Into<String>, season: Season, count: usize) -> Self {
        Self {
            city: city.into(),
            season,
            baseline: Baseline::Insufficient { count },
        }
    }

    /// `(mean, std_dev)` when established.
    pub fn stats(&self) -> Option<(f64, f64)> {
        match self.baseline {
            Baseline::Established { mean, std_dev, .. } => Some((mean, std_dev)),
            Baseline::Insufficient { .. } => None,
        }
    }

    pub fn mean(&self) -> Option<f64> {
        self.stats().map(|(m, _)| m)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.stats().map(|(_, s)| s)
    }

    /// Number of readings the baseline was built from.
    pub fn count(&self) -> usize {
        match self.baseline {
            Baseline::Established { count, .. } | Baseline::Insufficient { count } => count,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self.baseline, Baseline::Insufficient { .. })
    }

    /// Anomaly bounds `mean ± k·std_dev`, when established.
    pub fn bounds(&self, k: f64) -> Option<(f64, f64)> {
        self.stats().map(|(m, s)| (m - k * s, m + k * s))
    }
}

/// Flat row form of a profile, as exchanged with tabular stores.
///
/// A NaN `std_dev` or a `count` below [`MIN_PROFILE_READINGS`] marks an
/// insufficient group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub city: String,
    pub season: Season,
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

/// Profiles keyed by (city, season). Keys are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileTable {
    profiles: BTreeMap<String, BTreeMap<Season, SeasonalProfile>>,
}

impl ProfileTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap profiles already keyed by city and season.
    pub(super) fn from_keyed(profiles: BTreeMap<String, BTreeMap<Season, SeasonalProfile>>) -> Self {
        Self { profiles }
    }

    /// Add a profile. Fails if the (city, season) key already exists.
    pub fn insert(&mut self, profile: SeasonalProfile) -> Result<()> {
        let seasons = self.profiles.entry(profile.city.clone()).or_default();
        if seasons.contains_key(&profile.season) {
            return Err(ClimateError::DuplicateProfile {
                city: profile.city,
                season: profile.season,
            });
        }
        seasons.insert(profile.season, profile);
        Ok(())
    }

    /// Build from externally supplied rows, rejecting duplicate keys.
    pub fn from_rows(rows: &[ProfileRow]) -> Result<Self> {
        let mut table = Self::new();
        for (i, row) in rows.iter().enumerate() {
            if row.city.trim().is_empty() {
                return Err(ClimateError::malformed(i, "missing city"));
            }
            let profile = if row.count < MIN_PROFILE_READINGS || row.std_dev.is_nan() {
                SeasonalProfile::insufficient(row.city.clone(), row.season, row.count)
            } else {
                if !row.mean.is_finite() {
                    return Err(ClimateError::malformed(i, "mean is not finite"));
                }
                if !row.std_dev.is_finite() || row.std_dev < 0.0 {
                    return Err(ClimateError::malformed(
                        i,
                        format!("invalid standard deviation {}", row.std_dev),
                    ));
                }
                SeasonalProfile::established(
                    row.city.clone(),
                    row.season,
                    row.mean,
                    row.std_dev,
                    row.count,
                )
            };
            table.insert(profile)?;
        }
        Ok(table)
    }

    /// Flatten back to rows, in city then season order.
    pub fn to_rows(&self) -> Vec<ProfileRow> {
        self.iter()
            .map(|p| {
                let (mean, std_dev) = p.stats().unwrap_or((f64::NAN, f64::NAN));
                ProfileRow {
                    city: p.city.clone(),
                    season: p.season,
                    mean,
                    std_dev,
                    count: p.count(),
                }
            })
            .collect()
    }

    pub fn get(&self, city: &str, season: Season) -> Option<&SeasonalProfile> {
        self.profiles.get(city).and_then(|s| s.get(&season))
    }

    /// Like [`get`](Self::get) but surfaces a missing key as an error.
    pub fn lookup(&self, city: &str, season: Season) -> Result<&SeasonalProfile> {
        self.get(city, season)
            .ok_or_else(|| ClimateError::ProfileNotFound {
                city: city.to_string(),
                season,
            })
    }

    /// One city's profiles in winter, spring, summer, autumn order.
    pub fn for_city(&self, city: &str) -> Vec<&SeasonalProfile> {
        self.profiles
            .get(city)
            .map(|s| s.values().collect())
            .unwrap_or_default()
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeasonalProfile> {
        self.profiles.values().flat_map(|s| s.values())
    }

    pub fn len(&self) -> usize {
        self.profiles.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
