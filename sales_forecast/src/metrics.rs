//! Evaluation metrics in original dollar units

use crate::error::Result;
use sales_math::metrics::{mean_absolute_error, r_squared, root_mean_squared_error, round_to};
use serde::{Deserialize, Serialize};

/// Accuracy summary for one model, rounded for presentation:
/// MAE and RMSE to cents, R² to three decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

/// Evaluate predictions against actuals, both in dollars.
pub fn evaluate_dollars(actual: &[f64], predicted: &[f64]) -> Result<Metrics> {
    let mae = mean_absolute_error(actual, predicted)?;
    let rmse = root_mean_squared_error(actual, predicted)?;
    let r2 = r_squared(actual, predicted)?;

    Ok(Metrics {
        mae: round_to(mae, 2),
        rmse: round_to(rmse, 2),
        r2: round_to(r2, 3),
    })
}

/// Clip negative predictions to zero; negative sales forecasts are
/// physically impossible.
pub fn clip_non_negative(values: &mut [f64]) {
    for value in values {
        if *value < 0.0 {
            *value = 0.0;
        }
    }
}
