//! Autocorrelation of a time series at a fixed lag
//!
//! Used by the seasonality heuristic: a weekly series with a strong
//! yearly pattern shows high autocorrelation at lag 52.

use crate::{MathError, Result};

/// Autocorrelation of `values` at the given lag.
///
/// Computed as the lag-k autocovariance over the full-series variance,
/// both normalized by the series length. A series with (near) zero
/// variance returns 0.0: a flat series carries no seasonal signal.
pub fn autocorrelation(values: &[f64], lag: usize) -> Result<f64> {
    if lag == 0 {
        return Err(MathError::InvalidParameter(
            "Lag must be at least 1".to_string(),
        ));
    }
    if values.len() <= lag {
        return Err(MathError::InsufficientData(format!(
            "Need more than {} observations for lag-{} autocorrelation, got {}",
            lag,
            lag,
            values.len()
        )));
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    if variance < 1e-12 {
        return Ok(0.0);
    }

    let covariance = (0..values.len() - lag)
        .map(|i| (values[i] - mean) * (values[i + lag] - mean))
        .sum::<f64>()
        / n;

    Ok(covariance / variance)
}
