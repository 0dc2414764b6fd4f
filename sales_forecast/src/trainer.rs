//! Cross-sectional model training and evaluation
//!
//! Fits two regressors of materially different inductive bias (a random
//! forest and a feed-forward network) on the engineered features against
//! the log-sales target, then evaluates both in original dollar units on
//! a chronological hold-out.

use crate::config::TrainerConfig;
use crate::error::{ForecastError, Result};
use crate::features::FeatureTable;
use crate::metrics::{clip_non_negative, evaluate_dollars, Metrics};
use crate::models::forest::RandomForest;
use crate::models::neural::NeuralNet;
use crate::models::{Regressor, TrainedRegressor};
use sales_math::scaling::StandardScaler;
use sales_math::splitting::split_index;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Actual and predicted dollar sales for one test row, keyed by its ISO
/// week for downstream aggregation by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPrediction {
    pub week: u32,
    pub actual: f64,
    pub predicted: f64,
}

/// Result of one training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Dollar-unit accuracy per model name
    pub metrics: BTreeMap<String, Metrics>,
    /// Test-row actual/predicted pairs from the primary (tree ensemble)
    /// model, unaggregated
    pub predictions: Vec<WeekPrediction>,
}

/// Train, evaluate, and report on all cross-sectional models.
///
/// The split is chronological — the feature table arrives date-sorted
/// and is never shuffled — and the scaler is fitted on the training
/// rows only.
pub fn train_models(features: &FeatureTable, config: &TrainerConfig) -> Result<TrainingReport> {
    if features.len() < 2 {
        return Err(ForecastError::InsufficientData(format!(
            "Need at least 2 feature rows to train, got {}",
            features.len()
        )));
    }

    let split = split_index(features.len(), config.train_fraction)?;
    if split == 0 || split == features.len() {
        return Err(ForecastError::InsufficientData(format!(
            "Chronological split at {} leaves an empty side for {} rows",
            split,
            features.len()
        )));
    }

    let (train_rows, test_rows) = features.rows.split_at(split);
    let (train_targets, _) = features.targets.split_at(split);
    let test_actuals = &features.actuals[split..];
    let test_weeks = &features.weeks[split..];

    let scaler = StandardScaler::fit(train_rows)?;
    let train_scaled = scaler.transform(train_rows)?;
    let test_scaled = scaler.transform(test_rows)?;

    tracing::debug!(
        train_rows = train_scaled.len(),
        test_rows = test_scaled.len(),
        predictors = features.schema.len(),
        "fitting cross-sectional models"
    );

    let mut metrics = BTreeMap::new();

    let forest = RandomForest::new(
        config.n_trees,
        config.max_depth,
        config.min_samples_split,
        config.seed,
    )?;
    let trained_forest = forest.train(&train_scaled, train_targets)?;
    let forest_dollars = predict_dollars(&trained_forest, &test_scaled)?;
    metrics.insert(
        forest.name().to_string(),
        evaluate_dollars(test_actuals, &forest_dollars)?,
    );

    let network = NeuralNet::new(
        config.hidden_units,
        config.epochs,
        config.learning_rate,
        config.seed,
    )?;
    let trained_network = network.train(&train_scaled, train_targets)?;
    let network_dollars = predict_dollars(&trained_network, &test_scaled)?;
    metrics.insert(
        network.name().to_string(),
        evaluate_dollars(test_actuals, &network_dollars)?,
    );

    let predictions = test_weeks
        .iter()
        .zip(test_actuals.iter())
        .zip(forest_dollars.iter())
        .map(|((&week, &actual), &predicted)| WeekPrediction {
            week,
            actual,
            predicted,
        })
        .collect();

    Ok(TrainingReport {
        metrics,
        predictions,
    })
}

/// Predict on the log scale, invert with expm1, and clip to the
/// physically possible range.
fn predict_dollars<M: TrainedRegressor>(model: &M, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
    let mut dollars: Vec<f64> = model
        .predict(rows)?
        .into_iter()
        .map(f64::exp_m1)
        .collect();
    clip_non_negative(&mut dollars);
    Ok(dollars)
}
