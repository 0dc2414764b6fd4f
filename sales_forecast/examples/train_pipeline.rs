//! End-to-end pipeline run on synthetic data
//!
//! Generates two stores of weekly sales, trains the cross-sectional
//! models, forecasts one store 12 weeks ahead, and prints the merged
//! response as the dashboard would receive it.

use chrono::{Duration, NaiveDate};
use sales_forecast::config::{AppConfig, PipelineSettings};
use sales_forecast::data::{SalesRecord, SalesTable, Scope};
use sales_forecast::pipeline::{run_training, TrainRequest};
use sales_forecast::residuals::residual_diagnostics;

fn main() -> sales_forecast::Result<()> {
    let config = AppConfig::default();
    config.init_tracing();

    let start = NaiveDate::from_ymd_opt(2010, 2, 5).expect("valid date");
    let mut records = Vec::new();
    for store in 1..=2u32 {
        for week in 0..120usize {
            let seasonal = 800.0 * (2.0 * std::f64::consts::PI * week as f64 / 52.0).sin();
            records.push(SalesRecord {
                store,
                dept: 1,
                date: start + Duration::days(7 * week as i64),
                weekly_sales: 4_000.0 * store as f64 + 30.0 * week as f64 + seasonal,
                is_holiday: week % 26 == 0,
            });
        }
    }
    let table = SalesTable::new(records);

    let request = TrainRequest {
        scope: Scope::Store,
        store: Some(1),
        dept: None,
        horizon: 12,
    };

    let response = run_training(&table, &request, &PipelineSettings::default())?;
    println!("{}", serde_json::to_string_pretty(&response).expect("serializable response"));

    let residuals = residual_diagnostics(&table, 1, 1, 0.2)?;
    println!(
        "residuals: {} train, {} validation",
        residuals.train_residuals.len(),
        residuals.valid_residuals.len()
    );

    Ok(())
}
