//! # anofox-climate
//!
//! Seasonal temperature analytics for city weather histories.
//!
//! Builds per-city seasonal baselines, flags anomalous readings over history
//! with a trailing moving average, classifies live readings as high, low or
//! normal, and groups cities by climate similarity with seeded k-means.
//!
//! # Example
//!
//! ```
//! use anofox_climate::prelude::*;
//! use chrono::NaiveDate;
//!
//! let day = |m, d| NaiveDate::from_ymd_opt(2015, m, d).unwrap();
//! let batch = ReadingBatch::new(vec![
//!     Reading::on_date("Oslo", day(1, 1), -6.0),
//!     Reading::on_date("Oslo", day(1, 2), -2.0),
//!     Reading::on_date("Oslo", day(7, 1), 17.0),
//!     Reading::on_date("Oslo", day(7, 2), 19.0),
//! ])
//! .unwrap();
//!
//! let report = ClimateAnalysis::default().run(&batch).unwrap();
//! let at = day(1, 20).and_hms_opt(9, 0, 0).unwrap();
//! let verdict = report.classify("Oslo", 12.0, at).unwrap();
//! assert_eq!(verdict.category, AnomalyCategory::High);
//! ```

#![allow(clippy::needless_range_loop)]

pub mod analysis;
pub mod clustering;
pub mod core;
pub mod detection;
pub mod error;
pub mod features;
pub mod profile;
pub mod stats;
pub mod transform;

pub use error::{ClimateError, Result};

pub mod prelude {
    pub use crate::analysis::{AnalysisConfig, ClimateAnalysis, ClimateReport};
    pub use crate::clustering::{cluster, CityClusterer, ClusterAssignment, KMeansConfig};
    pub use crate::core::{LiveObservation, RawReading, Reading, ReadingBatch, Season};
    pub use crate::detection::{
        classify, AnnotatedReading, AnomalyCategory, Classification, LiveAnomalyClassifier,
        RollingAnomalyDetector, RollingConfig,
    };
    pub use crate::error::{ClimateError, Result};
    pub use crate::features::{extract, CityFeatureVector};
    pub use crate::profile::{Dispersion, ProfileTable, SeasonalProfile, SeasonalProfileBuilder};
}
