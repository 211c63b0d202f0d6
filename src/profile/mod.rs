//! Seasonal temperature profiles.
//!
//! A profile is the (mean, standard deviation) baseline of one city in one
//! season. Groups with fewer than two readings carry an explicit
//! [`Baseline::Insufficient`] marker instead of a NaN spread.
//!
//! # Example
//!
//! ```
//! use anofox_climate::core::{Reading, Season};
//! use anofox_climate::profile::SeasonalProfileBuilder;
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2010, 1, d).unwrap();
//! let readings = vec![
//!     Reading::on_date("Moscow", day(1), -5.0),
//!     Reading::on_date("Moscow", day(2), -3.0),
//! ];
//! let table = SeasonalProfileBuilder::new().build(&readings);
//! let winter = table.get("Moscow", Season::Winter).unwrap();
//! assert_eq!(winter.mean(), Some(-4.0));
//! ```

mod builder;
mod table;

pub use builder::{build_profiles, Dispersion, SeasonalProfileBuilder};
pub use table::{Baseline, ProfileRow, ProfileTable, SeasonalProfile, MIN_PROFILE_READINGS};
