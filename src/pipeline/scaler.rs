//! Standard scaling: `(x - mean) / std` with statistics fitted once

use serde::{Deserialize, Serialize};

use super::error::{PipelineError, Result};

/// Fitted parameters for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScale {
    pub column: String,
    pub mean: f64,
    pub scale: f64,
}

/// Standard scaler over a fixed set of named columns.
///
/// Uses the population standard deviation. A column with (numerically) zero
/// variance gets a scale of 1 so it is centred but not blown up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    params: Vec<ColumnScale>,
}

impl StandardScaler {
    /// Fit mean and scale for each `(name, values)` pair.
    pub fn fit<'a>(columns: impl IntoIterator<Item = (&'a str, &'a [f64])>) -> Result<Self> {
        let mut params = Vec::new();

        for (name, values) in columns {
            if values.is_empty() {
                return Err(PipelineError::insufficient(format!(
                    "cannot fit scaler on empty column '{}'",
                    name
                )));
            }
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();

            if !mean.is_finite() || !std.is_finite() {
                return Err(PipelineError::insufficient(format!(
                    "non-finite statistics for column '{}'",
                    name
                )));
            }

            let scale = if std <= 10.0 * f64::EPSILON * mean.abs().max(1.0) {
                1.0
            } else {
                std
            };

            params.push(ColumnScale {
                column: name.to_string(),
                mean,
                scale,
            });
        }

        Ok(Self { params })
    }

    pub fn params(&self) -> &[ColumnScale] {
        &self.params
    }

    /// Parameters for `column`, if it was fitted
    pub fn get(&self, column: &str) -> Option<&ColumnScale> {
        self.params.iter().find(|p| p.column == column)
    }

    /// Scale a single value of `column`
    pub fn transform_value(&self, column: &str, value: f64) -> Option<f64> {
        self.get(column).map(|p| (value - p.mean) / p.scale)
    }

    /// Scale every value of `column`
    pub fn transform(&self, column: &str, values: &[f64]) -> Option<Vec<f64>> {
        let p = self.get(column)?;
        Some(values.iter().map(|v| (v - p.mean) / p.scale).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_population_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let scaler = StandardScaler::fit([("x", &values[..])]).unwrap();
        let p = scaler.get("x").unwrap();
        assert!((p.mean - 5.0).abs() < 1e-12);
        assert!((p.scale - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_transformed_column_has_zero_mean_unit_variance() {
        let values = [1.0, 3.0, 8.0, 10.0, 13.0];
        let scaler = StandardScaler::fit([("x", &values[..])]).unwrap();
        let scaled = scaler.transform("x", &values).unwrap();

        let mean = scaled.iter().sum::<f64>() / scaled.len() as f64;
        let var = scaled.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / scaled.len() as f64;
        assert!(mean.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_gets_unit_scale() {
        let values = [3.0, 3.0, 3.0];
        let scaler = StandardScaler::fit([("c", &values[..])]).unwrap();
        assert_eq!(scaler.get("c").unwrap().scale, 1.0);
        assert_eq!(scaler.transform_value("c", 3.0), Some(0.0));
    }

    #[test]
    fn test_empty_column_is_rejected() {
        let err = StandardScaler::fit([("x", &[][..])]).unwrap_err();
        assert!(matches!(err, PipelineError::InsufficientData { .. }));
    }

    #[test]
    fn test_unknown_column() {
        let scaler = StandardScaler::fit([("x", &[1.0, 2.0][..])]).unwrap();
        assert!(scaler.transform_value("y", 1.0).is_none());
    }
}
