//! Trailing window functions.

/// Trailing moving average with a shrinking window at the series start.
///
/// Position `i` averages `series[i + 1 - window..=i]`, or `series[..=i]`
/// while fewer than `window` points are available. The window never pads,
/// so the first output equals the first input. Each position is averaged
/// directly, so a window of one reproduces the input exactly.
///
/// # Arguments
/// * `series` - Input values in time order
/// * `window` - Window size; `0` yields all-NaN
pub fn trailing_mean(series: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return vec![f64::NAN; series.len()];
    }

    (0..series.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let segment = &series[start..=i];
            segment.iter().sum::<f64>() / segment.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn window_shrinks_at_start() {
        let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = trailing_mean(&series, 3);

        assert_relative_eq!(result[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(result[1], 1.5, epsilon = 1e-12);
        assert_relative_eq!(result[2], 2.0, epsilon = 1e-12);
        assert_relative_eq!(result[3], 3.0, epsilon = 1e-12);
        assert_relative_eq!(result[4], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn window_one_is_identity() {
        let series = vec![3.5, -1.0, 7.25, 0.1, 0.2, 0.3];
        assert_eq!(trailing_mean(&series, 1), series);
    }

    #[test]
    fn window_larger_than_series_is_expanding_mean() {
        let series = vec![2.0, 4.0, 6.0];
        let result = trailing_mean(&series, 10);
        assert_relative_eq!(result[2], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_window_and_empty_series() {
        assert!(trailing_mean(&[1.0, 2.0], 0).iter().all(|x| x.is_nan()));
        assert!(trailing_mean(&[], 5).is_empty());
    }
}
