//! Grouping cities by standardized climate features.

use super::kmeans::{kmeans, KMeansConfig};
use crate::error::Result;
use crate::features::CityFeatureVector;
use crate::transform::ColumnScaler;
use serde::Serialize;
use tracing::debug;

/// Cluster membership of one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterAssignment {
    pub city: String,
    pub cluster_id: usize,
}

/// A city's features joined with its cluster, for tabular display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterReportRow {
    #[serde(flatten)]
    pub features: CityFeatureVector,
    pub cluster_id: usize,
}

/// Outcome of clustering a set of cities.
#[derive(Debug, Clone, PartialEq)]
pub struct CityClustering {
    /// One assignment per input vector, in input order.
    pub assignments: Vec<ClusterAssignment>,
    /// Centroids in original feature units, `[mean, amplitude, winter_mean, summer_mean]`.
    pub centroids: Vec<Vec<f64>>,
    /// Within-cluster sum of squares in standardized units.
    pub inertia: f64,
    pub n_iter: usize,
}

impl CityClustering {
    pub fn cluster_of(&self, city: &str) -> Option<usize> {
        self.assignments
            .iter()
            .find(|a| a.city == city)
            .map(|a| a.cluster_id)
    }

    /// Cities in one cluster, in input order.
    pub fn members(&self, cluster_id: usize) -> Vec<&str> {
        self.assignments
            .iter()
            .filter(|a| a.cluster_id == cluster_id)
            .map(|a| a.city.as_str())
            .collect()
    }

    /// Number of cities per cluster, indexed by cluster id.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for a in &self.assignments {
            sizes[a.cluster_id] += 1;
        }
        sizes
    }

    /// Join assignments with their feature vectors, sorted by cluster then city.
    pub fn report(&self, vectors: &[CityFeatureVector]) -> Vec<ClusterReportRow> {
        let mut rows: Vec<ClusterReportRow> = vectors
            .iter()
            .filter_map(|v| {
                self.cluster_of(&v.city).map(|cluster_id| ClusterReportRow {
                    features: v.clone(),
                    cluster_id,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            a.cluster_id
                .cmp(&b.cluster_id)
                .then_with(|| a.features.city.cmp(&b.features.city))
        });
        rows
    }
}

/// Standardizes feature vectors and partitions cities with seeded k-means.
///
/// Standardization is per feature (zero mean, unit population variance across
/// cities), so amplitude and mean temperature weigh equally. A feature a city
/// lacks (NaN) is imputed with that feature's mean over the other cities.
///
/// Cluster ids are arbitrary labels. A fixed seed reproduces them exactly;
/// a different seed may permute them even when the grouping is the same.
#[derive(Debug, Clone, Default)]
pub struct CityClusterer {
    config: KMeansConfig,
}

impl CityClusterer {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    pub fn cluster(&self, vectors: &[CityFeatureVector]) -> Result<CityClustering> {
        let rows: Vec<Vec<f64>> = vectors.iter().map(|v| v.to_array().to_vec()).collect();
        let scaler = ColumnScaler::fit(&rows);
        let scaled = scaler.transform(&rows);

        let result = kmeans(&scaled, &self.config)?;

        let assignments = vectors
            .iter()
            .zip(result.labels.iter())
            .map(|(v, &cluster_id)| ClusterAssignment {
                city: v.city.clone(),
                cluster_id,
            })
            .collect();

        debug!(
            cities = vectors.len(),
            k = result.centroids.len(),
            inertia = result.inertia,
            seed = self.config.seed,
            "clustered cities"
        );

        Ok(CityClustering {
            assignments,
            centroids: scaler.inverse(&result.centroids),
            inertia: result.inertia,
            n_iter: result.n_iter,
        })
    }
}

/// Cluster cities into `k` groups with the given seed.
pub fn cluster(vectors: &[CityFeatureVector], k: usize, seed: u64) -> Result<Vec<ClusterAssignment>> {
    let config = KMeansConfig::default().k(k).seed(seed);
    CityClusterer::new(config)
        .cluster(vectors)
        .map(|c| c.assignments)
}
