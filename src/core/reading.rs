//! Temperature readings and validated reading batches.

use super::season::Season;
use crate::error::{ClimateError, Result};
use crate::stats::{self, Summary};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A single daily temperature observation for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub city: String,
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
}

impl Reading {
    pub fn new(city: impl Into<String>, timestamp: NaiveDateTime, temperature: f64) -> Self {
        Self {
            city: city.into(),
            timestamp,
            temperature,
        }
    }

    /// Reading at midnight of the given calendar date.
    pub fn on_date(city: impl Into<String>, date: NaiveDate, temperature: f64) -> Self {
        Self::new(city, date.and_time(chrono::NaiveTime::MIN), temperature)
    }

    /// Season from the fixed month table.
    pub fn season(&self) -> Season {
        Season::of(&self.timestamp)
    }
}

/// An unvalidated row as handed over by the ingestion layer.
///
/// Every field is optional so that missing columns surface as
/// [`ClimateError::MalformedInput`] instead of a panic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    pub city: Option<String>,
    pub timestamp: Option<String>,
    pub temperature: Option<f64>,
    /// Season label assigned upstream. Checked against the month table when present.
    pub season: Option<String>,
}

impl RawReading {
    pub fn new(city: &str, timestamp: &str, temperature: f64) -> Self {
        Self {
            city: Some(city.to_string()),
            timestamp: Some(timestamp.to_string()),
            temperature: Some(temperature),
            season: None,
        }
    }

    pub fn with_season(mut self, season: &str) -> Self {
        self.season = Some(season.to_string());
        self
    }

    fn validate(&self, row: usize) -> Result<Reading> {
        let city = match self.city.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => return Err(ClimateError::malformed(row, "missing city")),
        };

        let raw_ts = self
            .timestamp
            .as_deref()
            .ok_or_else(|| ClimateError::malformed(row, "missing timestamp"))?;
        let timestamp = parse_timestamp(raw_ts)
            .ok_or_else(|| ClimateError::malformed(row, format!("unparseable timestamp '{}'", raw_ts)))?;

        let temperature = self
            .temperature
            .ok_or_else(|| ClimateError::malformed(row, "missing temperature"))?;
        if !temperature.is_finite() {
            return Err(ClimateError::malformed(row, "temperature is not finite"));
        }

        if let Some(label) = self.season.as_deref() {
            let labeled: Season = label
                .parse()
                .map_err(|e: String| ClimateError::malformed(row, e))?;
            let derived = Season::of(&timestamp);
            if labeled != derived {
                return Err(ClimateError::malformed(
                    row,
                    format!(
                        "season label '{}' disagrees with {} derived from {}",
                        labeled, derived, raw_ts
                    ),
                ));
            }
        }

        Ok(Reading {
            city,
            timestamp,
            temperature,
        })
    }
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` (or with a `T`), or RFC 3339.
///
/// An RFC 3339 offset is dropped, keeping the local wall-clock time the
/// reading was recorded at, so its month and season stay as recorded.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d.and_time(chrono::NaiveTime::MIN));
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.naive_local())
}

/// A complete, validated historical batch.
///
/// Treated as an immutable snapshot for one computation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingBatch {
    readings: Vec<Reading>,
}

impl ReadingBatch {
    /// Wrap already-typed readings, rejecting non-finite temperatures or blank cities.
    pub fn new(readings: Vec<Reading>) -> Result<Self> {
        for (row, r) in readings.iter().enumerate() {
            if r.city.trim().is_empty() {
                return Err(ClimateError::malformed(row, "missing city"));
            }
            if !r.temperature.is_finite() {
                return Err(ClimateError::malformed(row, "temperature is not finite"));
            }
        }
        Ok(Self { readings })
    }

    /// Validate raw rows. The first bad row fails the whole batch.
    pub fn from_raw(rows: &[RawReading]) -> Result<Self> {
        let readings = rows
            .iter()
            .enumerate()
            .map(|(row, raw)| raw.validate(row))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(rows = readings.len(), "validated reading batch");
        Ok(Self { readings })
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Distinct city names, sorted.
    pub fn cities(&self) -> Vec<&str> {
        self.readings
            .iter()
            .map(|r| r.city.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Readings of one city, in input order.
    pub fn for_city(&self, city: &str) -> Vec<Reading> {
        self.readings
            .iter()
            .filter(|r| r.city == city)
            .cloned()
            .collect()
    }

    /// Temperatures of one city, in input order.
    pub fn temperatures(&self, city: &str) -> Vec<f64> {
        self.readings
            .iter()
            .filter(|r| r.city == city)
            .map(|r| r.temperature)
            .collect()
    }

    /// Summary statistics of one city's temperatures, `None` for an unknown city.
    pub fn describe_city(&self, city: &str) -> Option<Summary> {
        stats::describe(&self.temperatures(city))
    }

    /// Readings grouped by city, keyed in sorted city order.
    pub fn by_city(&self) -> BTreeMap<&str, Vec<&Reading>> {
        let mut groups: BTreeMap<&str, Vec<&Reading>> = BTreeMap::new();
        for r in &self.readings {
            groups.entry(r.city.as_str()).or_default().push(r);
        }
        groups
    }
}

impl AsRef<[Reading]> for ReadingBatch {
    fn as_ref(&self) -> &[Reading] {
        &self.readings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_supported_timestamp_formats() {
        let d = parse_timestamp("2010-01-05").unwrap();
        assert_eq!((d.year(), d.month(), d.day(), d.hour()), (2010, 1, 5, 0));

        let dt = parse_timestamp("2024-07-01 13:45:10").unwrap();
        assert_eq!((dt.month(), dt.hour(), dt.minute()), (7, 13, 45));

        let iso = parse_timestamp("2024-07-01T13:45:10").unwrap();
        assert_eq!(iso, dt);

        let rfc = parse_timestamp("2024-07-01T13:45:10+03:00").unwrap();
        assert_eq!(rfc, dt);

        assert!(parse_timestamp("01/07/2024").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn from_raw_accepts_consistent_rows() {
        let rows = vec![
            RawReading::new("Moscow", "2010-01-01", -5.0).with_season("winter"),
            RawReading::new("Moscow", "2010-07-01", 21.0).with_season("summer"),
            RawReading::new("Cairo", "2010-07-01", 35.0),
        ];
        let batch = ReadingBatch::from_raw(&rows).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.cities(), vec!["Cairo", "Moscow"]);
        assert_eq!(batch.for_city("Moscow").len(), 2);
    }

    #[test]
    fn missing_fields_fail_whole_batch() {
        let mut missing_temp = RawReading::new("Moscow", "2010-01-02", 0.0);
        missing_temp.temperature = None;
        let rows = vec![RawReading::new("Moscow", "2010-01-01", -5.0), missing_temp];

        let err = ReadingBatch::from_raw(&rows).unwrap_err();
        assert_eq!(err, ClimateError::malformed(1, "missing temperature"));
    }

    #[test]
    fn blank_city_is_malformed() {
        let rows = vec![RawReading::new("  ", "2010-01-01", -5.0)];
        assert!(matches!(
            ReadingBatch::from_raw(&rows),
            Err(ClimateError::MalformedInput { row: 0, .. })
        ));
    }

    #[test]
    fn unparseable_timestamp_is_malformed() {
        let rows = vec![RawReading::new("Paris", "yesterday", 12.0)];
        let err = ReadingBatch::from_raw(&rows).unwrap_err();
        assert_eq!(
            err,
            ClimateError::malformed(0, "unparseable timestamp 'yesterday'")
        );
    }

    #[test]
    fn season_label_must_match_month() {
        let rows = vec![RawReading::new("Paris", "2010-01-01", 3.0).with_season("summer")];
        assert!(matches!(
            ReadingBatch::from_raw(&rows),
            Err(ClimateError::MalformedInput { row: 0, .. })
        ));

        let rows = vec![RawReading::new("Paris", "2010-01-01", 3.0).with_season("dry")];
        assert!(ReadingBatch::from_raw(&rows).is_err());
    }

    #[test]
    fn non_finite_temperature_is_rejected() {
        let date = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        let readings = vec![Reading::on_date("Oslo", date, f64::NAN)];
        assert!(ReadingBatch::new(readings).is_err());
    }

    #[test]
    fn by_city_groups_in_sorted_order() {
        let date = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        let batch = ReadingBatch::new(vec![
            Reading::on_date("Tokyo", date, 5.0),
            Reading::on_date("Berlin", date, 1.0),
            Reading::on_date("Tokyo", date, 6.0),
        ])
        .unwrap();
        let groups = batch.by_city();
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["Berlin", "Tokyo"]);
        assert_eq!(groups["Tokyo"].len(), 2);
    }

    #[test]
    fn describe_city_summarizes_one_city() {
        let date = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        let batch = ReadingBatch::new(vec![
            Reading::on_date("Moscow", date, -5.0),
            Reading::on_date("Moscow", date, -3.0),
            Reading::on_date("Cairo", date, 18.0),
        ])
        .unwrap();
        let summary = batch.describe_city("Moscow").unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, -4.0);
        assert_eq!(summary.max, -3.0);
        assert!(batch.describe_city("Lima").is_none());
    }

    #[test]
    fn offset_timestamp_keeps_recorded_month() {
        let ts = parse_timestamp("2024-03-01T01:00:00+03:00").unwrap();
        assert_eq!((ts.month(), ts.day(), ts.hour()), (3, 1, 1));

        let rows = vec![
            RawReading::new("Moscow", "2024-03-01T01:00:00+03:00", 2.0).with_season("spring"),
            RawReading::new("Lima", "2024-05-31T22:00:00-05:00", 17.0).with_season("spring"),
        ];
        let batch = ReadingBatch::from_raw(&rows).unwrap();
        assert_eq!(batch.readings()[0].season(), Season::Spring);
        assert_eq!(batch.readings()[1].season(), Season::Spring);
    }

    #[test]
    fn fall_label_is_rejected() {
        let rows = vec![RawReading::new("Boston", "2010-10-01", 12.0).with_season("fall")];
        assert!(matches!(
            ReadingBatch::from_raw(&rows),
            Err(ClimateError::MalformedInput { row: 0, .. })
        ));
    }
}
