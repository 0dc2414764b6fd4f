//! Residual diagnostics for one (store, dept) series
//!
//! Residuals against a naive previous-week prediction, split
//! chronologically, with exponential smoothing applied to the training
//! side and continued — seeded by the last smoothed training value —
//! across the validation side.

use crate::data::{DatedValue, SalesTable};
use crate::error::{ForecastError, Result};
use sales_math::smoothing::{continue_smoothing, exponential_smoothing};
use sales_math::splitting::split_index;
use serde::{Deserialize, Serialize};

/// Chronological train share of the residual split
const TRAIN_FRACTION: f64 = 0.8;

/// Four parallel date-tagged series, ready for charting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidualReport {
    pub train_residuals: Vec<DatedValue>,
    pub valid_residuals: Vec<DatedValue>,
    pub smoothed_train: Vec<DatedValue>,
    pub smoothed_forecast: Vec<DatedValue>,
}

/// Compute residual diagnostics for one (store, dept) pair.
///
/// `alpha` must lie in (0, 1]: 1 disables smoothing, values at or below
/// zero are rejected as caller errors.
pub fn residual_diagnostics(
    table: &SalesTable,
    store: u32,
    dept: u32,
    alpha: f64,
) -> Result<ResidualReport> {
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(ForecastError::InvalidInput(format!(
            "Alpha must be in (0, 1], got {}",
            alpha
        )));
    }

    let records = table.filter_pair(store, dept);
    if records.is_empty() {
        return Err(ForecastError::InvalidInput(format!(
            "No rows for store {} dept {}",
            store, dept
        )));
    }

    // Naive prediction: previous period's actual, 0 when none exists.
    let residuals: Vec<f64> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let naive = if i == 0 {
                0.0
            } else {
                records[i - 1].weekly_sales
            };
            record.weekly_sales - naive
        })
        .collect();

    let split = split_index(records.len(), TRAIN_FRACTION)?;
    if split == 0 || split == records.len() {
        return Err(ForecastError::InsufficientData(format!(
            "Need both a train and a validation side, got {} rows",
            records.len()
        )));
    }

    let (train, valid) = residuals.split_at(split);

    let smoothed_train = exponential_smoothing(train, alpha)?;
    let seed = *smoothed_train
        .last()
        .ok_or_else(|| ForecastError::InsufficientData("Empty training split".to_string()))?;
    let smoothed_forecast = continue_smoothing(seed, valid, alpha)?;

    let tag = |values: &[f64], offset: usize| -> Vec<DatedValue> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| DatedValue {
                date: records[offset + i].date,
                value,
            })
            .collect()
    };

    Ok(ResidualReport {
        train_residuals: tag(train, 0),
        valid_residuals: tag(valid, split),
        smoothed_train: tag(&smoothed_train, 0),
        smoothed_forecast: tag(&smoothed_forecast, split),
    })
}
