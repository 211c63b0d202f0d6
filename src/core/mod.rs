//! Core data structures: readings, seasons and live observations.

mod live;
mod reading;
mod season;

pub use live::LiveObservation;
pub use reading::{parse_timestamp, RawReading, Reading, ReadingBatch};
pub use season::{CalendarSeasons, Season, SeasonResolver};
