//! City climate feature extraction.
//!
//! Each city's history is reduced to four numbers: overall mean,
//! amplitude (max - min), winter mean and summer mean.
//!
//! # Example
//!
//! ```
//! use anofox_climate::core::Reading;
//! use anofox_climate::features::extract;
//! use chrono::NaiveDate;
//!
//! let jan = NaiveDate::from_ymd_opt(2015, 1, 10).unwrap();
//! let jul = NaiveDate::from_ymd_opt(2015, 7, 10).unwrap();
//! let readings = vec![
//!     Reading::on_date("Oslo", jan, -4.0),
//!     Reading::on_date("Oslo", jul, 18.0),
//! ];
//! let features = extract(&readings);
//! assert_eq!(features["Oslo"].amplitude, 22.0);
//! ```

mod city;

pub use city::{extract, extract_with, CityFeatureVector, FEATURE_NAMES};
