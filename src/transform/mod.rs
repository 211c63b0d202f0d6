//! Data transformations: trailing moving averages and feature scaling.
//!
//! # Example
//!
//! ```
//! use anofox_climate::transform::{standardize_columns, trailing_mean};
//!
//! let temps = vec![1.0, 2.0, 3.0, 4.0];
//! let ma = trailing_mean(&temps, 2);
//! assert_eq!(ma[0], 1.0);
//!
//! let (scaled, _) = standardize_columns(&[vec![1.0, 10.0], vec![3.0, 30.0]]);
//! assert_eq!(scaled[0], vec![-1.0, -1.0]);
//! ```

pub mod scale;
pub mod window;

pub use scale::{standardize_columns, ColumnScaler};
pub use window::trailing_mean;
