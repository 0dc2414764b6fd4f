//! # Sales Forecast
//!
//! A Rust library for retail sales forecasting and model diagnostics.
//!
//! ## Features
//!
//! - Typed ingestion of weekly per-store/per-department sales records
//! - Leakage-safe feature engineering (calendar features, per-group log
//!   lags, log1p target)
//! - Cross-sectional regressors: random forest and feed-forward network,
//!   evaluated in dollar units on a chronological hold-out
//! - Seasonal autoregressive forecasting of aggregated weekly series
//!   with autocorrelation-driven model selection
//! - Naive-forecast residual diagnostics with exponential smoothing
//! - Descriptive dataset summaries for dashboards
//!
//! ## Quick Start
//!
//! ```no_run
//! use sales_forecast::config::PipelineSettings;
//! use sales_forecast::data::{DataLoader, Scope};
//! use sales_forecast::pipeline::{run_training, TrainRequest};
//!
//! # fn main() -> sales_forecast::Result<()> {
//! let table = DataLoader::from_csv("data/train.csv")?;
//!
//! let request = TrainRequest {
//!     scope: Scope::Store,
//!     store: Some(1),
//!     dept: None,
//!     horizon: 12,
//! };
//!
//! let response = run_training(&table, &request, &PipelineSettings::default())?;
//! println!("{}", serde_json::to_string_pretty(&response).unwrap());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod residuals;
pub mod seasonal;
pub mod summary;
pub mod trainer;

// Re-export commonly used types
pub use crate::data::{DataLoader, SalesRecord, SalesTable, Scope};
pub use crate::error::{ForecastError, Result};
pub use crate::pipeline::{run_training, TrainRequest, TrainResponse};
pub use crate::seasonal::ForecastOutcome;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
