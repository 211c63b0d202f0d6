//! Column-wise standardization of feature matrices.

/// Parameters of a fitted column-wise standardization.
#[derive(Debug, Clone)]
pub struct ColumnScaler {
    /// Per-column mean.
    pub centers: Vec<f64>,
    /// Per-column population standard deviation, `1.0` for constant columns.
    pub scales: Vec<f64>,
}

impl ColumnScaler {
    /// Fit on row-major data. NaN cells are ignored when estimating a column.
    ///
    /// A column with no finite cell gets center `0.0`.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let dims = rows.first().map_or(0, |r| r.len());
        let mut centers = Vec::with_capacity(dims);
        let mut scales = Vec::with_capacity(dims);

        for j in 0..dims {
            let column: Vec<f64> = rows
                .iter()
                .filter_map(|r| r.get(j).copied())
                .filter(|x| x.is_finite())
                .collect();

            if column.is_empty() {
                centers.push(0.0);
                scales.push(1.0);
                continue;
            }

            let n = column.len() as f64;
            let mean = column.iter().sum::<f64>() / n;
            let variance = column.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();

            centers.push(mean);
            scales.push(if std < 1e-10 { 1.0 } else { std });
        }

        Self { centers, scales }
    }

    /// Scale rows with the fitted parameters.
    ///
    /// Missing (NaN) cells are imputed with the column center, i.e. become `0.0`.
    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter()
            .map(|row| {
                row.iter()
                    .zip(self.centers.iter().zip(self.scales.iter()))
                    .map(|(&x, (&c, &s))| if x.is_finite() { (x - c) / s } else { 0.0 })
                    .collect()
            })
            .collect()
    }

    /// Recover original units from scaled rows.
    pub fn inverse(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter()
            .map(|row| {
                row.iter()
                    .zip(self.centers.iter().zip(self.scales.iter()))
                    .map(|(&x, (&c, &s))| x * s + c)
                    .collect()
            })
            .collect()
    }
}

/// Standardize each column to zero mean and unit population variance.
///
/// x_scaled = (x - mean) / std
pub fn standardize_columns(rows: &[Vec<f64>]) -> (Vec<Vec<f64>>, ColumnScaler) {
    let scaler = ColumnScaler::fit(rows);
    (scaler.transform(rows), scaler)
}
