//! One batch pass over a historical dataset.
//!
//! [`ClimateAnalysis`] wires the components together: seasonal profiles,
//! rolling anomaly annotation per city, feature extraction and clustering.
//! The resulting [`ClimateReport`] also serves live classification against
//! the profiles it built.

use crate::clustering::{CityClusterer, CityClustering, ClusterReportRow, KMeansConfig};
use crate::core::{LiveObservation, ReadingBatch};
use crate::detection::{
    AnnotatedReading, Classification, LiveAnomalyClassifier, RollingAnomalyDetector,
    RollingConfig, DEFAULT_SIGMA,
};
use crate::error::{ClimateError, Result};
use crate::features::{extract, CityFeatureVector};
use crate::profile::{Dispersion, ProfileTable, SeasonalProfileBuilder};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Settings for a full analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub rolling: RollingConfig,
    pub kmeans: KMeansConfig,
    pub dispersion: Dispersion,
    /// Sigma multiplier for live classification bounds.
    pub sigma: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rolling: RollingConfig::default(),
            kmeans: KMeansConfig::default(),
            dispersion: Dispersion::default(),
            sigma: DEFAULT_SIGMA,
        }
    }
}

impl AnalysisConfig {
    pub fn rolling(mut self, rolling: RollingConfig) -> Self {
        self.rolling = rolling;
        self
    }

    pub fn kmeans(mut self, kmeans: KMeansConfig) -> Self {
        self.kmeans = kmeans;
        self
    }

    pub fn dispersion(mut self, dispersion: Dispersion) -> Self {
        self.dispersion = dispersion;
        self
    }

    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.rolling.validate()?;
        self.kmeans.validate()?;
        if !(self.sigma.is_finite() && self.sigma >= 0.0) {
            return Err(ClimateError::InvalidParameter(format!(
                "sigma must be finite and non-negative, got {}",
                self.sigma
            )));
        }
        Ok(())
    }
}

/// Everything computed from one historical batch.
#[derive(Debug, Clone)]
pub struct ClimateReport {
    pub profiles: ProfileTable,
    /// Annotated readings per city, each in timestamp order.
    pub annotated: BTreeMap<String, Vec<AnnotatedReading>>,
    /// One feature vector per city, in sorted city order.
    pub features: Vec<CityFeatureVector>,
    pub clustering: CityClustering,
    sigma: f64,
}

impl ClimateReport {
    /// Annotated history of one city.
    pub fn city(&self, city: &str) -> Option<&[AnnotatedReading]> {
        self.annotated.get(city).map(Vec::as_slice)
    }

    pub fn anomaly_count(&self, city: &str) -> usize {
        self.city(city)
            .map_or(0, |rows| rows.iter().filter(|a| a.is_anomaly).count())
    }

    /// Classify a live reading against this report's profiles.
    pub fn classify(&self, city: &str, temperature: f64, at: NaiveDateTime) -> Result<Classification> {
        LiveAnomalyClassifier::new(&self.profiles)
            .sigma(self.sigma)
            .classify(city, temperature, at)
    }

    pub fn classify_observation(&self, observation: &LiveObservation) -> Result<Classification> {
        LiveAnomalyClassifier::new(&self.profiles)
            .sigma(self.sigma)
            .classify_observation(observation)
    }

    /// Feature vectors joined with cluster ids, sorted by cluster then city.
    pub fn cluster_report(&self) -> Vec<ClusterReportRow> {
        self.clustering.report(&self.features)
    }
}

/// Runs every batch component over a [`ReadingBatch`].
#[derive(Debug, Clone, Default)]
pub struct ClimateAnalysis {
    config: AnalysisConfig,
}

impl ClimateAnalysis {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn run(&self, batch: &ReadingBatch) -> Result<ClimateReport> {
        self.config.validate()?;
        if batch.is_empty() {
            return Err(ClimateError::EmptyData);
        }

        let profiles = SeasonalProfileBuilder::new()
            .dispersion(self.config.dispersion)
            .build(batch.readings());

        let annotated = RollingAnomalyDetector::new(self.config.rolling.clone())
            .detect_all(batch, &profiles)?;

        let features: Vec<CityFeatureVector> =
            extract(batch.readings()).into_values().collect();

        let clustering = CityClusterer::new(self.config.kmeans.clone()).cluster(&features)?;

        debug!(
            readings = batch.len(),
            cities = features.len(),
            profiles = profiles.len(),
            anomalies = annotated
                .values()
                .map(|rows| rows.iter().filter(|a| a.is_anomaly).count())
                .sum::<usize>(),
            "climate analysis complete"
        );

        Ok(ClimateReport {
            profiles,
            annotated,
            features,
            clustering,
            sigma: self.config.sigma,
        })
    }
}
