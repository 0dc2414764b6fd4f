//! Feature engineering for cross-sectional sales models
//!
//! Turns raw records into a model-ready table: calendar features,
//! leakage-safe per-group lag features on the log scale, and a log1p
//! target. Rows that cannot be fully featurized (non-positive sales,
//! undefined lags at the start of a group) are dropped deterministically.

use crate::config::FeatureConfig;
use crate::data::{SalesRecord, SalesTable};
use crate::error::{ForecastError, Result};
use chrono::Datelike;

/// Engineered feature table with a declared predictor schema.
///
/// `schema` lists predictor names in column order; `rows` hold the
/// predictor values, `targets` the log1p sales target, `weeks` the ISO
/// week of each row (for downstream charting), and `actuals` the raw
/// dollar sales kept for evaluation in original units.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    pub schema: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
    pub weeks: Vec<u32>,
    pub actuals: Vec<f64>,
}

impl FeatureTable {
    /// Number of feature rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the feature table from raw records.
///
/// Pure function of its input: sorts by (store, dept, date), drops rows
/// with non-positive sales, computes lag features strictly within each
/// (store, dept) group, and drops the first `max(lags)` rows of every
/// group where lags are undefined. No imputation anywhere.
pub fn build_features(table: &SalesTable, config: &FeatureConfig) -> Result<FeatureTable> {
    if config.lags.is_empty() {
        return Err(ForecastError::InvalidInput(
            "Feature configuration needs at least one lag".to_string(),
        ));
    }
    if config.lags.contains(&0) {
        return Err(ForecastError::InvalidInput(
            "Lag offsets must be at least 1".to_string(),
        ));
    }

    let sorted = table.sorted_by_group_and_date();
    let positive: Vec<&SalesRecord> = sorted
        .iter()
        .filter(|r| r.weekly_sales > 0.0)
        .collect();

    let mut schema: Vec<String> = ["store", "dept", "year", "month", "week", "day", "is_holiday"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for lag in &config.lags {
        schema.push(format!("lag_{}", lag));
    }

    let max_lag = *config.lags.iter().max().unwrap_or(&1);

    let mut rows = Vec::new();
    let mut targets = Vec::new();
    let mut weeks = Vec::new();
    let mut actuals = Vec::new();

    let mut group_start = 0;
    for i in 0..positive.len() {
        let record = positive[i];
        if i > 0
            && (record.store != positive[i - 1].store || record.dept != positive[i - 1].dept)
        {
            group_start = i;
        }

        // Lags are undefined for the first max_lag rows of each group.
        let offset = i - group_start;
        if offset < max_lag {
            continue;
        }

        let week = record.date.iso_week().week();
        let mut row = vec![
            record.store as f64,
            record.dept as f64,
            record.date.year() as f64,
            record.date.month() as f64,
            week as f64,
            record.date.day() as f64,
            if record.is_holiday { 1.0 } else { 0.0 },
        ];
        for &lag in &config.lags {
            row.push(positive[i - lag].weekly_sales.ln_1p());
        }

        rows.push(row);
        targets.push(record.weekly_sales.ln_1p());
        weeks.push(week);
        actuals.push(record.weekly_sales);
    }

    tracing::debug!(
        input_rows = table.len(),
        feature_rows = rows.len(),
        "feature engineering complete"
    );

    Ok(FeatureTable {
        schema,
        rows,
        targets,
        weeks,
        actuals,
    })
}
