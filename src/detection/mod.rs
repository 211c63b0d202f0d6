//! Anomaly detection against seasonal baselines.
//!
//! This module provides:
//! - Rolling moving averages with per-reading anomaly flags over history
//! - High/low/normal classification of a single live reading

mod live;
mod rolling;

pub use live::{
    classify, AnomalyBounds, AnomalyCategory, Classification, LiveAnomalyClassifier,
    DEFAULT_SIGMA,
};
pub use rolling::{filter_range, AnnotatedReading, RollingAnomalyDetector, RollingConfig};
