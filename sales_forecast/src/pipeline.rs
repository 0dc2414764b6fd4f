//! Request orchestration
//!
//! Runs the full pipeline for one training request: validates inputs up
//! front, trains the cross-sectional models, runs the seasonal
//! forecaster, and merges everything into one serializable response.
//! A seasonal sub-pipeline failure degrades to an absent field; it never
//! takes the cross-sectional results down with it.

use crate::config::PipelineSettings;
use crate::data::{SalesTable, Scope};
use crate::error::{ForecastError, Result};
use crate::features::build_features;
use crate::seasonal::{self, ForecastOutcome};
use crate::summary::{dataset_summary, DatasetSummary};
use crate::trainer::{train_models, TrainingReport};
use serde::{Deserialize, Serialize};

/// One validated training request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainRequest {
    pub scope: Scope,
    pub store: Option<u32>,
    pub dept: Option<u32>,
    pub horizon: usize,
}

/// Merged response of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainResponse {
    pub summary: DatasetSummary,
    #[serde(flatten)]
    pub training: TrainingReport,
    /// Absent when the scoped series is too short or its model failed
    pub forecast: Option<ForecastOutcome>,
}

/// Validate a request against the data before any computation begins.
pub fn validate_request(table: &SalesTable, request: &TrainRequest) -> Result<()> {
    seasonal::validate_horizon(request.horizon)?;
    // Resolves scope/id consistency, including ids absent from the data.
    table.filter_scope(request.scope, request.store, request.dept)?;
    Ok(())
}

/// Run the full pipeline for one request.
pub fn run_training(
    table: &SalesTable,
    request: &TrainRequest,
    settings: &PipelineSettings,
) -> Result<TrainResponse> {
    validate_request(table, request)?;

    let summary = dataset_summary(table)?;

    let features = build_features(table, &settings.features)?;
    let training = train_models(&features, &settings.trainer)?;

    let forecast = match seasonal::forecast(
        table,
        request.scope,
        request.store,
        request.dept,
        request.horizon,
        &settings.seasonality,
    ) {
        Ok(outcome) => Some(outcome),
        // Input problems were caught by validation above; anything the
        // seasonal path reports now is its own failure and only costs
        // its own field.
        Err(err @ (ForecastError::InvalidInput(_) | ForecastError::MissingColumn(_))) => {
            return Err(err)
        }
        Err(err) => {
            tracing::warn!(error = %err, "seasonal forecast unavailable");
            None
        }
    };

    Ok(TrainResponse {
        summary,
        training,
        forecast,
    })
}
