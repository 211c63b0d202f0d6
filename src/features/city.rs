//! Per-city climate feature vectors.

use crate::core::{CalendarSeasons, Reading, Season, SeasonResolver};
use crate::stats;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Names of the clustering features, in [`CityFeatureVector::to_array`] order.
pub const FEATURE_NAMES: [&str; 4] = ["mean", "amplitude", "winter_mean", "summer_mean"];

/// Fixed-size summary of a city's full temperature history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityFeatureVector {
    pub city: String,
    /// Mean over all readings.
    pub mean: f64,
    /// `max - min` over all readings.
    pub amplitude: f64,
    /// Mean of winter readings; NaN if the city has none.
    pub winter_mean: f64,
    /// Mean of summer readings; NaN if the city has none.
    pub summer_mean: f64,
}

impl CityFeatureVector {
    pub fn to_array(&self) -> [f64; 4] {
        [self.mean, self.amplitude, self.winter_mean, self.summer_mean]
    }

    /// True when every feature is a finite number.
    pub fn is_complete(&self) -> bool {
        self.to_array().iter().all(|x| x.is_finite())
    }
}

/// Reduce each city's readings to a [`CityFeatureVector`].
pub fn extract(readings: &[Reading]) -> BTreeMap<String, CityFeatureVector> {
    extract_with(readings, &CalendarSeasons)
}

/// Like [`extract`] with a custom season mapping.
pub fn extract_with<R: SeasonResolver>(
    readings: &[Reading],
    resolver: &R,
) -> BTreeMap<String, CityFeatureVector> {
    #[derive(Default)]
    struct Acc {
        all: Vec<f64>,
        winter: Vec<f64>,
        summer: Vec<f64>,
    }

    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
    for r in readings {
        let acc = groups.entry(r.city.as_str()).or_default();
        acc.all.push(r.temperature);
        match resolver.season_of(&r.timestamp) {
            Season::Winter => acc.winter.push(r.temperature),
            Season::Summer => acc.summer.push(r.temperature),
            Season::Spring | Season::Autumn => {}
        }
    }

    let vectors: BTreeMap<String, CityFeatureVector> = groups
        .into_iter()
        .map(|(city, acc)| {
            let vector = CityFeatureVector {
                city: city.to_string(),
                mean: stats::mean(&acc.all),
                amplitude: stats::maximum(&acc.all) - stats::minimum(&acc.all),
                winter_mean: stats::mean(&acc.winter),
                summer_mean: stats::mean(&acc.summer),
            };
            (city.to_string(), vector)
        })
        .collect();

    debug!(
        cities = vectors.len(),
        incomplete = vectors.values().filter(|v| !v.is_complete()).count(),
        "extracted city features"
    );
    vectors
}
