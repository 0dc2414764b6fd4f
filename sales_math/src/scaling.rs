//! Predictor standardization
//!
//! Zero-mean, unit-variance scaling fitted on one table and applied to
//! another with the same fitted parameters, so test-set statistics never
//! leak into the transform.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Column-wise standard scaler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit scaling parameters on a rectangular table of rows.
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let width = match rows.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => {
                return Err(MathError::InsufficientData(
                    "Cannot fit scaler on an empty table".to_string(),
                ))
            }
        };
        if rows.iter().any(|row| row.len() != width) {
            return Err(MathError::LengthMismatch(
                "All rows must have the same number of columns".to_string(),
            ));
        }

        let n = rows.len() as f64;
        let mut means = vec![0.0; width];
        for row in rows {
            for (j, value) in row.iter().enumerate() {
                means[j] += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut stds = vec![0.0; width];
        for row in rows {
            for (j, value) in row.iter().enumerate() {
                stds[j] += (value - means[j]).powi(2);
            }
        }
        for std in &mut stds {
            *std = (*std / n).sqrt();
            // A constant column carries no scale information; dividing by
            // 1 leaves its centered values untouched.
            if *std < 1e-12 {
                *std = 1.0;
            }
        }

        Ok(Self { means, stds })
    }

    /// Transform rows using the fitted parameters.
    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        if rows.iter().any(|row| row.len() != self.means.len()) {
            return Err(MathError::LengthMismatch(format!(
                "Rows must have {} columns to match the fitted scaler",
                self.means.len()
            )));
        }

        Ok(rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(j, value)| (value - self.means[j]) / self.stds[j])
                    .collect()
            })
            .collect())
    }

    /// Fitted per-column means
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Fitted per-column standard deviations
    pub fn stds(&self) -> &[f64] {
        &self.stds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitted_columns_standardize_to_zero_mean_unit_variance() {
        let rows = vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]];
        let scaler = StandardScaler::fit(&rows).unwrap();
        let scaled = scaler.transform(&rows).unwrap();

        for j in 0..2 {
            let mean: f64 = scaled.iter().map(|r| r[j]).sum::<f64>() / scaled.len() as f64;
            let var: f64 =
                scaled.iter().map(|r| (r[j] - mean).powi(2)).sum::<f64>() / scaled.len() as f64;
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn transform_uses_training_parameters_only() {
        let train = vec![vec![0.0], vec![2.0]];
        let scaler = StandardScaler::fit(&train).unwrap();

        // mean 1, std 1: a held-out 10.0 maps to 9.0 regardless of the
        // held-out set's own statistics.
        let scaled = scaler.transform(&[vec![10.0]]).unwrap();
        assert!((scaled[0][0] - 9.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_is_centered_not_exploded() {
        let rows = vec![vec![7.0], vec![7.0], vec![7.0]];
        let scaler = StandardScaler::fit(&rows).unwrap();
        let scaled = scaler.transform(&rows).unwrap();
        for row in scaled {
            assert_eq!(row[0], 0.0);
        }
    }

    #[test]
    fn empty_and_ragged_tables_rejected() {
        assert!(StandardScaler::fit(&[]).is_err());
        assert!(StandardScaler::fit(&[vec![1.0], vec![1.0, 2.0]]).is_err());

        let scaler = StandardScaler::fit(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert!(scaler.transform(&[vec![1.0]]).is_err());
    }
}
