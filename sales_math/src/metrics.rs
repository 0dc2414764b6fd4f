//! Forecast accuracy metrics
//!
//! MAE, RMSE and the coefficient of determination, computed over paired
//! actual/predicted slices of equal non-zero length.

use crate::{MathError, Result};

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(MathError::LengthMismatch(format!(
            "Actual ({}) and predicted ({}) must have the same non-zero length",
            actual.len(),
            predicted.len()
        )));
    }
    Ok(())
}

/// Mean Absolute Error
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Root Mean Squared Error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    Ok((sum / actual.len() as f64).sqrt())
}

/// Coefficient of determination (R-squared)
///
/// Fails when the actual values carry no variance, since the ratio of
/// residual to total sum of squares is undefined there.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;

    let mut ss_total = 0.0;
    let mut ss_residual = 0.0;
    for (a, p) in actual.iter().zip(predicted.iter()) {
        ss_total += (a - mean).powi(2);
        ss_residual += (a - p).powi(2);
    }

    if ss_total.abs() < 1e-10 {
        return Err(MathError::CalculationError(
            "Cannot calculate R-squared: actual values have no variance".to_string(),
        ));
    }

    Ok(1.0 - ss_residual / ss_total)
}

/// Round a value to a fixed number of decimal places
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (value * factor).round() / factor
}
