//! Regression models for the forecasting pipeline
//!
//! Cross-sectional regressors (random forest, feed-forward network) fit
//! engineered feature rows against the log-sales target; the seasonal
//! autoregressive model fits a single weekly series. All follow the same
//! two-type pattern: a configuration struct whose `train` produces an
//! immutable trained model.

use crate::error::Result;
use std::fmt::Debug;

pub mod forest;
pub mod neural;
pub mod sarima;

/// A trained cross-sectional regressor
pub trait TrainedRegressor: Debug {
    /// Predict targets for feature rows
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// A cross-sectional regressor that can be trained on feature rows
pub trait Regressor: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedRegressor;

    /// Fit the model to feature rows and their targets
    fn train(&self, rows: &[Vec<f64>], targets: &[f64]) -> Result<Self::Trained>;

    /// Name of the model
    fn name(&self) -> &str;
}
