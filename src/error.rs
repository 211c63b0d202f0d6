//! Error types for the anofox-climate library.

use crate::core::Season;
use thiserror::Error;

/// Result type alias for climate analysis operations.
pub type Result<T> = std::result::Result<T, ClimateError>;

/// Errors that can occur while building baselines or classifying readings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClimateError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for a meaningful statistic.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// No seasonal baseline exists for the requested city and season.
    #[error("no seasonal profile for city '{city}' in {season}")]
    ProfileNotFound { city: String, season: Season },

    /// A profile table received two rows for the same city and season.
    #[error("duplicate seasonal profile for city '{city}' in {season}")]
    DuplicateProfile { city: String, season: Season },

    /// An input row is missing a field or carries an unparseable value.
    #[error("malformed input at row {row}: {reason}")]
    MalformedInput { row: usize, reason: String },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ClimateError {
    pub(crate) fn malformed(row: usize, reason: impl Into<String>) -> Self {
        ClimateError::MalformedInput {
            row,
            reason: reason.into(),
        }
    }
}
