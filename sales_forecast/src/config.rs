//! Configuration for the forecasting pipeline
//!
//! Everything tunable lives in explicit structs handed in by the caller:
//! process-level settings in [`AppConfig`], per-stage policy in
//! [`PipelineSettings`]. The pipeline never reads environment state
//! directly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Process-level configuration, supplied once at startup by the host
/// (the HTTP layer or a batch runner).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Location of the raw sales CSV
    pub data_path: PathBuf,
    /// Origins the serving layer should allow
    pub cors_origins: Vec<String>,
    /// Filter directive for log output, e.g. "info" or "sales_forecast=debug"
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/train.csv"),
            cors_origins: vec!["http://localhost:5173".to_string()],
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Install a global tracing subscriber honoring `log_level`.
    ///
    /// Safe to call once per process; later calls are ignored.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_new(&self.log_level)
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init();
    }
}

/// Lag configuration for the feature engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Lag offsets, in periods, of the log-sales lag features
    pub lags: Vec<usize>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            lags: vec![1, 2, 3, 52],
        }
    }
}

/// Hyperparameters of the cross-sectional trainer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Chronological train fraction
    pub train_fraction: f64,
    /// Trees in the random forest
    pub n_trees: usize,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples required to split a tree node
    pub min_samples_split: usize,
    /// Hidden units in the feed-forward network
    pub hidden_units: usize,
    /// Training epochs for the network
    pub epochs: usize,
    /// Gradient step size for the network
    pub learning_rate: f64,
    /// Seed for bootstrap sampling and weight initialization
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            train_fraction: 0.8,
            n_trees: 100,
            max_depth: 8,
            min_samples_split: 4,
            hidden_units: 32,
            epochs: 200,
            learning_rate: 0.01,
            seed: 42,
        }
    }
}

/// Seasonality policy for the seasonal forecaster.
///
/// These thresholds encode an empirical policy choice, so they are
/// fields rather than constants; the defaults carry the reference
/// values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalityPolicy {
    /// Periods per season (52 weeks per year)
    pub period: usize,
    /// Minimum series length before autocorrelation is even considered
    /// (two full seasons)
    pub min_acf_len: usize,
    /// Minimum series length for the seasonal model (three full seasons)
    pub min_seasonal_len: usize,
    /// Minimum lag-`period` autocorrelation for the seasonal model
    pub acf_threshold: f64,
    /// Absolute floor on series length
    pub min_periods: usize,
    /// Extra periods required beyond the horizon
    pub horizon_margin: usize,
    /// Held-out evaluation runs when the series is at least this many
    /// horizons long
    pub eval_multiple: usize,
}

impl Default for SeasonalityPolicy {
    fn default() -> Self {
        Self {
            period: 52,
            min_acf_len: 104,
            min_seasonal_len: 156,
            acf_threshold: 0.3,
            min_periods: 20,
            horizon_margin: 5,
            eval_multiple: 3,
        }
    }
}

/// Per-request settings for the full pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineSettings {
    pub features: FeatureConfig,
    pub trainer: TrainerConfig,
    pub seasonality: SeasonalityPolicy,
}
