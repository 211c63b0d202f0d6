//! Statistical helpers shared by the profile, detection and feature modules.
//!
//! # Example
//!
//! ```
//! use anofox_climate::stats::{describe, histogram};
//!
//! let temps = vec![-5.0, -3.0, -20.0, 1.0];
//! let summary = describe(&temps).unwrap();
//! assert_eq!(summary.count, 4);
//!
//! let hist = histogram(&temps, 3).unwrap();
//! assert_eq!(hist.bins.len(), 3);
//! ```

mod histogram;
mod summary;

pub use histogram::{histogram, seasonal_histogram, Bin, Histogram};
pub use summary::{
    describe, maximum, mean, minimum, population_std_dev, quantile, sample_std_dev, Summary,
};
