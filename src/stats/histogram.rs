//! Equal-width temperature histograms.

use crate::core::{ReadingBatch, Season};
use crate::error::{ClimateError, Result};
use serde::Serialize;

/// One histogram bin covering `[lower, upper)`; the last bin is closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Histogram of a temperature series with its mean marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
    pub mean: f64,
    pub total: usize,
}

/// Build a histogram with `bins` equal-width bins spanning `[min, max]`.
///
/// A constant series gets a single unit-wide range centred on its value.
/// An empty series yields empty bins and a NaN mean.
pub fn histogram(values: &[f64], bins: usize) -> Result<Histogram> {
    if bins == 0 {
        return Err(ClimateError::InvalidParameter(
            "histogram needs at least one bin".to_string(),
        ));
    }
    if values.is_empty() {
        return Ok(Histogram {
            bins: Vec::new(),
            mean: f64::NAN,
            total: 0,
        });
    }

    let mut lo = super::minimum(values);
    let mut hi = super::maximum(values);
    if (hi - lo).abs() < 1e-12 {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lower: lo + i as f64 * width,
            upper: lo + (i + 1) as f64 * width,
            count,
        })
        .collect();

    Ok(Histogram {
        bins,
        mean: super::mean(values),
        total: values.len(),
    })
}

/// Histogram of one city's temperatures restricted to the selected seasons.
pub fn seasonal_histogram(
    batch: &ReadingBatch,
    city: &str,
    seasons: &[Season],
    bins: usize,
) -> Result<Histogram> {
    let values: Vec<f64> = batch
        .readings()
        .iter()
        .filter(|r| r.city == city && seasons.contains(&r.season()))
        .map(|r| r.temperature)
        .collect();
    histogram(&values, bins)
}
