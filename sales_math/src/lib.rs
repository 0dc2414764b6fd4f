//! # Sales Math
//!
//! Numeric primitives shared by the sales forecasting pipeline.
//! This crate provides the calculations the pipeline crate composes:
//! exponential smoothing, forecast accuracy metrics, predictor
//! standardization, chronological splitting, and autocorrelation.

use thiserror::Error;

pub mod correlation;
pub mod metrics;
pub mod scaling;
pub mod smoothing;
pub mod splitting;

/// Errors that can occur in forecasting-related calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Length mismatch: {0}")]
    LengthMismatch(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;
