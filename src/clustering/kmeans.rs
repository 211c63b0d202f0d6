//! Seeded k-means (Lloyd's algorithm) over fixed-length feature vectors.

use crate::error::{ClimateError, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// K-means configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,
    /// Maximum Lloyd iterations per run
    pub max_iter: usize,
    /// Number of independently initialized runs; the lowest inertia wins
    pub n_init: usize,
    /// Random seed for initialization
    pub seed: u64,
    /// Convergence tolerance on squared centroid movement
    pub tolerance: f64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 4,
            max_iter: 300,
            n_init: 10,
            seed: 42,
            tolerance: 1e-4,
        }
    }
}

impl KMeansConfig {
    /// Set number of clusters.
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set maximum iterations.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set number of restarts.
    pub fn n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(ClimateError::InvalidParameter(
                "k must be at least 1".to_string(),
            ));
        }
        if self.max_iter == 0 || self.n_init == 0 {
            return Err(ClimateError::InvalidParameter(
                "max_iter and n_init must be positive".to_string(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ClimateError::InvalidParameter(format!(
                "tolerance must be a non-negative finite number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// K-means clustering result.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    /// Cluster assignment for each point (0-indexed)
    pub labels: Vec<usize>,
    /// Cluster centroids
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances to the assigned centroid
    pub inertia: f64,
    /// Iterations performed by the winning run
    pub n_iter: usize,
}

/// Partition points into `k` clusters minimizing within-cluster squared
/// Euclidean distance.
///
/// Initialization is k-means++ driven by `config.seed`, so identical input
/// and seed always give identical output. Labels are renumbered in order of
/// first appearance; they carry no meaning across different seeds.
/// `k` is clamped to the number of points.
pub fn kmeans(points: &[Vec<f64>], config: &KMeansConfig) -> Result<KMeansResult> {
    config.validate()?;

    let n = points.len();
    if n == 0 {
        return Ok(KMeansResult {
            labels: Vec::new(),
            centroids: Vec::new(),
            inertia: 0.0,
            n_iter: 0,
        });
    }

    let dims = points[0].len();
    for p in points {
        if p.len() != dims {
            return Err(ClimateError::InvalidParameter(format!(
                "all points must have {} dimensions, got {}",
                dims,
                p.len()
            )));
        }
        if p.iter().any(|x| !x.is_finite()) {
            return Err(ClimateError::InvalidParameter(
                "points must be finite".to_string(),
            ));
        }
    }

    let k = config.k.min(n);
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut best: Option<KMeansResult> = None;
    for run in 0..config.n_init {
        let result = lloyd(points, k, config, &mut rng);
        trace!(run, inertia = result.inertia, n_iter = result.n_iter, "k-means run");
        if best.as_ref().map_or(true, |b| result.inertia < b.inertia) {
            best = Some(result);
        }
    }

    let best = best.map(relabel_by_first_appearance).ok_or_else(|| {
        ClimateError::InvalidParameter("n_init must be positive".to_string())
    })?;
    debug!(
        points = n,
        k,
        inertia = best.inertia,
        n_iter = best.n_iter,
        "k-means converged"
    );
    Ok(best)
}

/// One seeded k-means++ initialization followed by Lloyd iterations.
fn lloyd(
    points: &[Vec<f64>],
    k: usize,
    config: &KMeansConfig,
    rng: &mut StdRng,
) -> KMeansResult {
    let mut centroids = initialize_centroids(points, k, rng);
    let mut labels = vec![0; points.len()];
    let mut n_iter = 0;

    for iter in 0..config.max_iter {
        n_iter = iter + 1;

        // Assignment step
        for (i, p) in points.iter().enumerate() {
            labels[i] = find_nearest_centroid(p, &centroids).0;
        }

        // Update step
        let updated = update_centroids(points, &labels, &centroids);
        let shift = centroids
            .iter()
            .zip(updated.iter())
            .map(|(a, b)| squared_distance(a, b))
            .fold(0.0, f64::max);
        centroids = updated;

        if shift <= config.tolerance {
            break;
        }
    }

    let mut inertia = 0.0;
    for (i, p) in points.iter().enumerate() {
        let (nearest, dist) = find_nearest_centroid(p, &centroids);
        labels[i] = nearest;
        inertia += dist;
    }

    KMeansResult {
        labels,
        centroids,
        inertia,
        n_iter,
    }
}

/// k-means++: each next centroid is drawn with probability proportional to
/// its squared distance from the nearest chosen one.
fn initialize_centroids(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)].clone());

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        // All weights zero means every point already coincides with a centroid.
        let idx = match WeightedIndex::new(&nearest) {
            Ok(dist) => dist.sample(rng),
            Err(_) => rng.gen_range(0..n),
        };
        let chosen = points[idx].clone();
        for (d, p) in nearest.iter_mut().zip(points.iter()) {
            *d = d.min(squared_distance(p, &chosen));
        }
        centroids.push(chosen);
    }

    centroids
}

/// Nearest centroid and its squared distance. Ties go to the lower index.
fn find_nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut min_dist = f64::INFINITY;
    let mut nearest = 0;

    for (i, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < min_dist {
            min_dist = dist;
            nearest = i;
        }
    }

    (nearest, min_dist)
}

/// Mean of each cluster's members.
///
/// An emptied cluster is moved onto the point farthest from its current
/// centroid, so `k` clusters survive every iteration. Several emptied
/// clusters take distinct points.
fn update_centroids(
    points: &[Vec<f64>],
    labels: &[usize],
    previous: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let k = previous.len();
    let dims = points[0].len();
    let mut sums = vec![vec![0.0; dims]; k];
    let mut counts = vec![0usize; k];

    for (p, &l) in points.iter().zip(labels.iter()) {
        counts[l] += 1;
        for (s, x) in sums[l].iter_mut().zip(p.iter()) {
            *s += x;
        }
    }

    let mut centroids: Vec<Vec<f64>> = sums
        .into_iter()
        .zip(counts.iter())
        .map(|(sum, &c)| {
            if c == 0 {
                Vec::new()
            } else {
                sum.into_iter().map(|s| s / c as f64).collect()
            }
        })
        .collect();

    let mut reseeded: Vec<usize> = Vec::new();
    for cluster in 0..k {
        if counts[cluster] > 0 {
            continue;
        }
        let farthest = points
            .iter()
            .zip(labels.iter())
            .enumerate()
            .filter(|(i, _)| !reseeded.contains(i))
            .map(|(i, (p, &l))| {
                let own = if centroids[l].is_empty() {
                    &previous[l]
                } else {
                    &centroids[l]
                };
                (i, squared_distance(p, own))
            })
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, best_d)) if best_d >= d => best,
                _ => Some((i, d)),
            });
        // More empty clusters than points cannot happen since k <= n.
        let chosen = farthest.map_or(0, |(i, _)| i);
        reseeded.push(chosen);
        centroids[cluster] = points[chosen].clone();
    }

    centroids
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Renumber clusters so labels appear in increasing order along the input.
fn relabel_by_first_appearance(result: KMeansResult) -> KMeansResult {
    let k = result.centroids.len();
    let mut mapping = vec![usize::MAX; k];
    let mut next = 0;
    for &l in &result.labels {
        if mapping[l] == usize::MAX {
            mapping[l] = next;
            next += 1;
        }
    }
    for m in mapping.iter_mut().filter(|m| **m == usize::MAX) {
        *m = next;
        next += 1;
    }

    let mut centroids = vec![Vec::new(); k];
    for (old, centroid) in result.centroids.into_iter().enumerate() {
        centroids[mapping[old]] = centroid;
    }

    KMeansResult {
        labels: result.labels.iter().map(|&l| mapping[l]).collect(),
        centroids,
        inertia: result.inertia,
        n_iter: result.n_iter,
    }
}
