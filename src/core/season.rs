//! Meteorological seasons and the fixed month-to-season table.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four meteorological seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

/// Northern-Hemisphere month table, indexed by zero-based month.
///
/// Dec-Feb winter, Mar-May spring, Jun-Aug summer, Sep-Nov autumn.
const MONTH_TO_SEASON: [Season; 12] = [
    Season::Winter,
    Season::Winter,
    Season::Spring,
    Season::Spring,
    Season::Spring,
    Season::Summer,
    Season::Summer,
    Season::Summer,
    Season::Autumn,
    Season::Autumn,
    Season::Autumn,
    Season::Winter,
];

impl Season {
    /// All seasons in calendar order, starting from winter.
    pub const ALL: [Season; 4] = [
        Season::Winter,
        Season::Spring,
        Season::Summer,
        Season::Autumn,
    ];

    /// Season for a calendar month (1 = January).
    ///
    /// Returns `None` for months outside 1..=12.
    pub fn from_month(month: u32) -> Option<Season> {
        if (1..=12).contains(&month) {
            Some(MONTH_TO_SEASON[(month - 1) as usize])
        } else {
            None
        }
    }

    /// Season of any chrono date-like value.
    pub fn of<D: Datelike>(date: &D) -> Season {
        MONTH_TO_SEASON[date.month0() as usize]
    }

    /// Lowercase label used in tabular inputs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" => Ok(Season::Autumn),
            other => Err(format!("unknown season '{}'", other)),
        }
    }
}

/// Maps a reading timestamp to its season.
///
/// Implemented by [`CalendarSeasons`] and by any `Fn(&NaiveDateTime) -> Season`,
/// so callers can plug in a different convention for tests.
pub trait SeasonResolver {
    fn season_of(&self, timestamp: &NaiveDateTime) -> Season;
}

/// The fixed Northern-Hemisphere month table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarSeasons;

impl SeasonResolver for CalendarSeasons {
    fn season_of(&self, timestamp: &NaiveDateTime) -> Season {
        Season::of(timestamp)
    }
}

impl<F> SeasonResolver for F
where
    F: Fn(&NaiveDateTime) -> Season,
{
    fn season_of(&self, timestamp: &NaiveDateTime) -> Season {
        self(timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn month_table_matches_meteorological_seasons() {
        let expected = [
            (1, Season::Winter),
            (2, Season::Winter),
            (3, Season::Spring),
            (5, Season::Spring),
            (6, Season::Summer),
            (8, Season::Summer),
            (9, Season::Autumn),
            (11, Season::Autumn),
            (12, Season::Winter),
        ];
        for (month, season) in expected {
            assert_eq!(Season::from_month(month), Some(season), "month {}", month);
        }
    }

    #[test]
    fn out_of_range_month_has_no_season() {
        assert_eq!(Season::from_month(0), None);
        assert_eq!(Season::from_month(13), None);
    }

    #[test]
    fn each_season_spans_three_months() {
        for season in Season::ALL {
            let months = (1..=12)
                .filter(|&m| Season::from_month(m) == Some(season))
                .count();
            assert_eq!(months, 3);
        }
    }

    #[test]
    fn parse_and_display_agree() {
        for season in Season::ALL {
            assert_eq!(season.to_string().parse::<Season>(), Ok(season));
        }
        assert_eq!(" Winter ".parse::<Season>(), Ok(Season::Winter));
        assert!("monsoon".parse::<Season>().is_err());
        assert!("fall".parse::<Season>().is_err());
    }

    #[test]
    fn calendar_resolver_uses_month() {
        let ts = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        assert_eq!(CalendarSeasons.season_of(&ts), Season::Winter);
    }

    #[test]
    fn closures_act_as_resolvers() {
        let always_summer = |_: &NaiveDateTime| Season::Summer;
        let ts = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(always_summer.season_of(&ts), Season::Summer);
    }
}
