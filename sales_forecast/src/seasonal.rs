//! Seasonal forecasting of aggregated weekly sales
//!
//! Aggregates the selected scope into one gap-filled weekly series,
//! decides between a seasonal and a non-seasonal autoregressive model
//! from the series length and its lag-52 autocorrelation, optionally
//! evaluates on a held-out tail, and produces the final horizon-step
//! forecast.

use crate::config::SeasonalityPolicy;
use crate::data::{DatedValue, SalesTable, Scope, WeeklySeries};
use crate::error::{ForecastError, Result};
use crate::metrics::{clip_non_negative, evaluate_dollars, Metrics};
use crate::models::sarima::Sarima;
use sales_math::correlation::autocorrelation;
use serde::{Deserialize, Serialize};

/// Periods of history returned for charting context
const HISTORY_PERIODS: usize = 52;

/// Inclusive bounds on the forecast horizon
pub const MIN_HORIZON: usize = 1;
pub const MAX_HORIZON: usize = 52;

/// Which model family the seasonality heuristic selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelChoice {
    /// (1,1,1) without a seasonal component
    NonSeasonal,
    /// (1,1,1) with an added (1,1,1) component at the policy period
    Seasonal,
}

/// Forecast output for one scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastOutcome {
    /// Held-out accuracy; absent when the series is too short to spare
    /// a test window
    pub metrics: Option<Metrics>,
    /// The most recent actual periods, for charting
    pub history: Vec<DatedValue>,
    /// Exactly `horizon` future periods, all values >= 0
    pub forecast: Vec<DatedValue>,
}

/// Decide the model family for a series.
///
/// The seasonal path requires both enough history to estimate a yearly
/// component and a material lag-period autocorrelation; the
/// autocorrelation itself is only consulted once two full seasons exist.
pub fn select_model(series: &[f64], policy: &SeasonalityPolicy) -> Result<ModelChoice> {
    if series.len() < policy.min_acf_len {
        return Ok(ModelChoice::NonSeasonal);
    }

    let acf = autocorrelation(series, policy.period)?;
    tracing::debug!(len = series.len(), lag = policy.period, acf, "seasonality check");

    if series.len() >= policy.min_seasonal_len && acf >= policy.acf_threshold {
        Ok(ModelChoice::Seasonal)
    } else {
        Ok(ModelChoice::NonSeasonal)
    }
}

/// Validate a forecast horizon.
pub fn validate_horizon(horizon: usize) -> Result<()> {
    if !(MIN_HORIZON..=MAX_HORIZON).contains(&horizon) {
        return Err(ForecastError::InvalidInput(format!(
            "Horizon must be between {} and {}, got {}",
            MIN_HORIZON, MAX_HORIZON, horizon
        )));
    }
    Ok(())
}

/// Forecast aggregated sales for a scope.
///
/// Fails with [`ForecastError::InsufficientData`] — recoverable by the
/// caller — when the aggregated series cannot support the horizon.
pub fn forecast(
    table: &SalesTable,
    scope: Scope,
    store: Option<u32>,
    dept: Option<u32>,
    horizon: usize,
    policy: &SeasonalityPolicy,
) -> Result<ForecastOutcome> {
    validate_horizon(horizon)?;

    let scoped = table.filter_scope(scope, store, dept)?;
    let series = scoped.weekly_totals()?;

    let required = policy.min_periods.max(horizon + policy.horizon_margin);
    if series.len() < required {
        return Err(ForecastError::InsufficientData(format!(
            "Need at least {} weekly periods for a {}-step forecast, got {}",
            required,
            horizon,
            series.len()
        )));
    }

    let choice = select_model(series.values(), policy)?;
    let model = build_model(choice, policy)?;
    tracing::info!(model = model.name(), periods = series.len(), horizon, "seasonal fit");

    let metrics = if series.len() >= policy.eval_multiple * horizon {
        Some(evaluate_holdout(&series, &model, horizon)?)
    } else {
        None
    };

    let trained = model.train(series.values())?;
    let mut values = trained.forecast(horizon)?;
    clip_non_negative(&mut values);

    let forecast = series
        .future_dates(horizon)
        .into_iter()
        .zip(values)
        .map(|(date, value)| DatedValue { date, value })
        .collect();

    Ok(ForecastOutcome {
        metrics,
        history: series.tail(HISTORY_PERIODS),
        forecast,
    })
}

fn build_model(choice: ModelChoice, policy: &SeasonalityPolicy) -> Result<Sarima> {
    match choice {
        ModelChoice::NonSeasonal => Sarima::new(1, 1, 1),
        ModelChoice::Seasonal => Sarima::with_seasonal(1, 1, 1, policy.period),
    }
}

/// Fit on everything except the last `horizon` periods and score the
/// forecast against that tail, in dollars.
fn evaluate_holdout(series: &WeeklySeries, model: &Sarima, horizon: usize) -> Result<Metrics> {
    let values = series.values();
    let split = values.len() - horizon;

    let trained = model.train(&values[..split])?;
    let mut predicted = trained.forecast(horizon)?;
    clip_non_negative(&mut predicted);

    evaluate_dollars(&values[split..], &predicted)
}
