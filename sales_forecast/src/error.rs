//! Error types for the sales_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A caller-supplied parameter or identifier is invalid; reported
    /// before any computation begins
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required column is absent from the raw table
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Not enough observations to run a computation; recoverable for the
    /// seasonal forecaster, which callers degrade to an absent field
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A model failed to fit; fatal for its own sub-pipeline only
    #[error("Model fit failed: {0}")]
    ModelFit(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    Polars(String),

    /// Error from a numeric primitive
    #[error("Math error: {0}")]
    Math(#[from] sales_math::MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::Polars(err.to_string())
    }
}

impl ForecastError {
    /// Whether a caller may degrade gracefully instead of failing the
    /// whole request.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ForecastError::InsufficientData(_))
    }
}
