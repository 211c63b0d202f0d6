//! City climate walkthrough: profiles, anomalies, live check and clustering.
//!
//! Run with: cargo run --example city_climate
//! Set RUST_LOG=anofox_climate=debug to see pipeline logging.

use anofox_climate::clustering::KMeansConfig;
use anofox_climate::core::{LiveObservation, RawReading, ReadingBatch, Season};
use anofox_climate::detection::{filter_range, RollingConfig};
use anofox_climate::features::FEATURE_NAMES;
use anofox_climate::prelude::{AnalysisConfig, ClimateAnalysis};
use anofox_climate::stats::seasonal_histogram;
use chrono::{Duration, NaiveDate};
use tracing_subscriber::EnvFilter;

/// Three years of daily readings for a few cities with distinct climates.
fn sample_rows() -> Vec<RawReading> {
    let cities = [
        ("Moscow", 5.8, 14.0),
        ("Stockholm", 7.5, 10.5),
        ("Singapore", 27.6, 1.0),
        ("Mumbai", 27.2, 2.5),
        ("Cairo", 22.3, 7.0),
        ("Riyadh", 26.5, 10.0),
    ];
    let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
    let mut rows = Vec::new();
    for (c, (city, mean, half_range)) in cities.iter().enumerate() {
        for d in 0..(3 * 365) {
            let date = start + Duration::days(d);
            let phase = 2.0 * std::f64::consts::PI * (d as f64 - 196.0) / 365.25;
            let noise = ((d as usize * 37 + c * 11) % 13) as f64 / 3.0 - 2.0;
            let mut t = mean + half_range * phase.cos() + noise;
            // A few heat spikes for the detector to find.
            if d % 211 == 0 {
                t += 12.0;
            }
            rows.push(RawReading::new(city, &date.format("%Y-%m-%d").to_string(), t));
        }
    }
    rows
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== anofox-climate: city climate walkthrough ===\n");

    let batch = match ReadingBatch::from_raw(&sample_rows()) {
        Ok(batch) => batch,
        Err(e) => {
            eprintln!("could not load readings: {e}");
            return;
        }
    };
    println!("Loaded {} readings for {:?}", batch.len(), batch.cities());

    let config = AnalysisConfig::default()
        .rolling(RollingConfig::default().window(30).k(2.0))
        .kmeans(KMeansConfig::default().k(3).seed(42));
    let report = match ClimateAnalysis::new(config).run(&batch) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("analysis failed: {e}");
            return;
        }
    };

    println!("\n--- Seasonal profiles: Moscow ---");
    for profile in report.profiles.for_city("Moscow") {
        match profile.stats() {
            Some((mean, std_dev)) => println!(
                "  {:<7} mean {:>6.2}  std {:>5.2}  n={}",
                profile.season,
                mean,
                std_dev,
                profile.count()
            ),
            None => println!("  {:<7} insufficient data", profile.season),
        }
    }

    if let Some(summary) = batch.describe_city("Moscow") {
        println!(
            "\n  overall: min {:.1}  median {:.1}  max {:.1}",
            summary.min, summary.median, summary.max
        );
    }

    println!("\n--- Anomalies per city ---");
    for city in batch.cities() {
        println!("  {:<10} {}", city, report.anomaly_count(city));
    }

    if let Some(history) = report.city("Cairo") {
        let from = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2020, 8, 31).unwrap();
        if let Ok(summer) = filter_range(history, from, to) {
            let flagged = summer.iter().filter(|a| a.is_anomaly).count();
            println!(
                "\n  Cairo, summer 2020: {} days, {} anomalous",
                summer.len(),
                flagged
            );
        }
    }

    println!("\n--- Winter histogram: Stockholm ---");
    if let Ok(hist) = seasonal_histogram(&batch, "Stockholm", &[Season::Winter], 8) {
        for bin in &hist.bins {
            println!(
                "  [{:>6.1}, {:>6.1})  {}",
                bin.lower,
                bin.upper,
                "#".repeat(bin.count / 4)
            );
        }
    }

    println!("\n--- Live check ---");
    let now = NaiveDate::from_ymd_opt(2024, 1, 18)
        .and_then(|d| d.and_hms_opt(14, 0, 0));
    if let Some(now) = now {
        let live = LiveObservation {
            city: "Moscow".to_string(),
            temperature: 4.0,
            feels_like: 1.5,
            pressure: 1012.0,
            humidity: 81.0,
            wind_speed: 5.2,
            description: "light rain".to_string(),
            timestamp: now,
        };
        match report.classify_observation(&live) {
            Ok(verdict) => println!(
                "  {} at {:.1}: {} (normal range {:.1} .. {:.1})",
                live.city,
                live.temperature,
                verdict.category.describe(),
                verdict.bounds.low,
                verdict.bounds.high
            ),
            Err(e) => println!("  {}: {e}", live.city),
        }
    }

    println!("\n--- Clusters ({}) ---", FEATURE_NAMES.join(", "));
    for row in report.cluster_report() {
        let f = &row.features;
        println!(
            "  cluster {}  {:<10} {:>6.2} {:>6.2} {:>6.2} {:>6.2}",
            row.cluster_id, f.city, f.mean, f.amplitude, f.winter_mean, f.summer_mean
        );
    }
    for (id, size) in report.clustering.cluster_sizes().iter().enumerate() {
        println!("  cluster {id}: {size} cities");
    }
    println!("  inertia: {:.3}", report.clustering.inertia);
}
