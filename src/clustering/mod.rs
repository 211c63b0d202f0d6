//! City clustering by climate similarity.
//!
//! Provides seeded k-means and a clusterer that standardizes
//! [`CityFeatureVector`](crate::features::CityFeatureVector)s before grouping.
//!
//! # Example
//!
//! ```
//! use anofox_climate::clustering::{kmeans, KMeansConfig};
//!
//! let points = vec![
//!     vec![1.0, 2.0],
//!     vec![1.1, 2.1],
//!     vec![10.0, 11.0],
//!     vec![10.1, 11.1],
//! ];
//! let config = KMeansConfig::default().k(2).seed(42);
//! let result = kmeans(&points, &config).unwrap();
//! assert_eq!(result.labels, vec![0, 0, 1, 1]);
//! ```

pub mod city;
pub mod kmeans;

pub use city::{cluster, CityClusterer, CityClustering, ClusterAssignment, ClusterReportRow};
pub use kmeans::{kmeans, KMeansConfig, KMeansResult};
