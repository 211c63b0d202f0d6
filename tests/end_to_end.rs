//! End-to-end scenarios across profile building, detection and clustering.

use anofox_climate::prelude::*;
use anofox_climate::profile::Baseline;
use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime};

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn moscow_winter() -> ReadingBatch {
    let rows = vec![
        RawReading::new("Moscow", "2010-01-01", -5.0).with_season("winter"),
        RawReading::new("Moscow", "2010-01-02", -3.0).with_season("winter"),
        RawReading::new("Moscow", "2010-02-01", -20.0).with_season("winter"),
    ];
    ReadingBatch::from_raw(&rows).unwrap()
}

#[test]
fn moscow_population_spread_flags_low() {
    let profiles = SeasonalProfileBuilder::new()
        .dispersion(Dispersion::Population)
        .build(moscow_winter().readings());

    let winter = profiles.lookup("Moscow", Season::Winter).unwrap();
    assert_relative_eq!(winter.mean().unwrap(), -28.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(winter.std_dev().unwrap(), 7.586538, epsilon = 1e-6);

    let verdict = classify("Moscow", -25.0, at(2024, 1, 15), &profiles).unwrap();
    assert_eq!(verdict.category, AnomalyCategory::Low);
    assert_relative_eq!(verdict.bounds.low, -24.506, epsilon = 1e-3);
    assert_relative_eq!(verdict.bounds.high, 5.840, epsilon = 1e-3);
    assert_eq!(verdict.category.describe(), "abnormally low temperature");
}

#[test]
fn moscow_sample_spread_keeps_reading_normal() {
    let profiles = SeasonalProfileBuilder::new().build(moscow_winter().readings());

    let winter = profiles.lookup("Moscow", Season::Winter).unwrap();
    assert_relative_eq!(winter.std_dev().unwrap(), (259.0_f64 / 3.0).sqrt(), epsilon = 1e-12);

    let verdict = classify("Moscow", -25.0, at(2024, 1, 15), &profiles).unwrap();
    assert_eq!(verdict.category, AnomalyCategory::Normal);
    assert!(verdict.bounds.low < -25.0);
}

#[test]
fn live_reading_for_unknown_season_is_not_found() {
    let profiles = SeasonalProfileBuilder::new().build(moscow_winter().readings());
    let err = classify("Moscow", 20.0, at(2024, 7, 1), &profiles).unwrap_err();
    assert_eq!(
        err,
        ClimateError::ProfileNotFound {
            city: "Moscow".to_string(),
            season: Season::Summer,
        }
    );
}

#[test]
fn one_bad_row_fails_the_batch() {
    let rows = vec![
        RawReading::new("Moscow", "2010-01-01", -5.0),
        RawReading::new("Moscow", "not a date", -3.0),
        RawReading::new("Moscow", "2010-01-03", -4.0),
    ];
    match ReadingBatch::from_raw(&rows) {
        Err(ClimateError::MalformedInput { row, .. }) => assert_eq!(row, 1),
        other => panic!("expected malformed input, got {other:?}"),
    }
}

#[test]
fn lone_seasonal_reading_is_never_flagged() {
    let batch = ReadingBatch::new(vec![
        Reading::new("Lima", at(2012, 1, 5), 24.0),
        Reading::new("Lima", at(2012, 7, 5), -40.0),
        Reading::new("Lima", at(2012, 7, 6), 15.0),
        Reading::new("Lima", at(2012, 7, 7), 16.0),
    ])
    .unwrap();
    let profiles = SeasonalProfileBuilder::new().build(batch.readings());
    assert!(matches!(
        profiles.lookup("Lima", Season::Winter).unwrap().baseline,
        Baseline::Insufficient { count: 1 }
    ));

    let annotated = RollingAnomalyDetector::new(RollingConfig::default())
        .detect(&batch.for_city("Lima"), &profiles)
        .unwrap();
    assert!(!annotated[0].is_anomaly);

    let err = classify("Lima", 30.0, at(2024, 1, 1), &profiles).unwrap_err();
    assert_eq!(err, ClimateError::InsufficientData { needed: 2, got: 1 });
}

#[test]
fn full_pass_over_several_cities() {
    let mut readings = Vec::new();
    let cities = [
        ("Moscow", -8.0, 19.0),
        ("Helsinki", -5.0, 17.0),
        ("Singapore", 26.5, 28.0),
        ("Jakarta", 26.0, 27.5),
    ];
    for (city, winter, summer) in cities {
        for d in 1..=28 {
            let jitter = ((d * 7) % 5) as f64 - 2.0;
            readings.push(Reading::new(city, at(2016, 1, d), winter + jitter));
            readings.push(Reading::new(city, at(2016, 4, d), (winter + summer) / 2.0 + jitter));
            readings.push(Reading::new(city, at(2016, 7, d), summer + jitter));
            readings.push(Reading::new(city, at(2016, 10, d), (winter + summer) / 2.0 - jitter));
        }
    }
    // Unordered input.
    readings.reverse();
    let batch = ReadingBatch::new(readings).unwrap();

    let config = AnalysisConfig::default().kmeans(KMeansConfig::default().k(2).seed(7));
    let report = ClimateAnalysis::new(config).run(&batch).unwrap();

    let moscow = report.city("Moscow").unwrap();
    assert!(moscow.windows(2).all(|w| w[0].reading.timestamp <= w[1].reading.timestamp));

    let clusters = &report.clustering;
    assert_eq!(clusters.cluster_of("Moscow"), clusters.cluster_of("Helsinki"));
    assert_eq!(clusters.cluster_of("Singapore"), clusters.cluster_of("Jakarta"));
    assert_ne!(clusters.cluster_of("Moscow"), clusters.cluster_of("Singapore"));

    let live = LiveObservation::bare("Singapore", 35.0, at(2025, 7, 3));
    let verdict = report.classify_observation(&live).unwrap();
    assert_eq!(verdict.category, AnomalyCategory::High);
}
