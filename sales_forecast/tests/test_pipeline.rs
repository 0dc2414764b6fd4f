use chrono::{Duration, NaiveDate};
use pretty_assertions::assert_eq;
use sales_forecast::config::{FeatureConfig, PipelineSettings, TrainerConfig};
use sales_forecast::data::{SalesRecord, SalesTable, Scope};
use sales_forecast::error::ForecastError;
use sales_forecast::pipeline::{run_training, TrainRequest};

fn fixture_table(weeks: usize) -> SalesTable {
    let start = NaiveDate::from_ymd_opt(2010, 2, 5).unwrap();
    let mut records = Vec::new();
    for store in 1..=2u32 {
        for i in 0..weeks {
            records.push(SalesRecord {
                store,
                dept: 1,
                date: start + Duration::days(7 * i as i64),
                weekly_sales: 2_000.0 * store as f64 + 40.0 * i as f64 + 250.0 * ((i % 4) as f64),
                is_holiday: i % 13 == 0,
            });
        }
    }
    SalesTable::new(records)
}

fn fast_settings() -> PipelineSettings {
    PipelineSettings {
        features: FeatureConfig { lags: vec![1, 2] },
        trainer: TrainerConfig {
            n_trees: 20,
            epochs: 80,
            ..TrainerConfig::default()
        },
        ..PipelineSettings::default()
    }
}

#[test]
fn test_full_run_merges_all_outputs() {
    let table = fixture_table(60);
    let request = TrainRequest {
        scope: Scope::Store,
        store: Some(1),
        dept: None,
        horizon: 12,
    };

    let response = run_training(&table, &request, &fast_settings()).unwrap();

    assert_eq!(response.summary.rows, 120);
    assert_eq!(response.summary.stores, 2);
    assert_eq!(response.training.metrics.len(), 2);
    assert!(!response.training.predictions.is_empty());

    let forecast = response.forecast.expect("seasonal forecast should be present");
    assert_eq!(forecast.forecast.len(), 12);
    assert!(forecast.metrics.is_some());
}

#[test]
fn test_short_series_degrades_to_absent_forecast() {
    // 15 weeks per store: enough for the cross-sectional trainer with
    // short lags, below the seasonal forecaster's minimum.
    let table = fixture_table(15);
    let request = TrainRequest {
        scope: Scope::Overall,
        store: None,
        dept: None,
        horizon: 12,
    };

    let response = run_training(&table, &request, &fast_settings()).unwrap();

    assert!(response.forecast.is_none());
    assert_eq!(response.training.metrics.len(), 2);
}

#[test]
fn test_invalid_ids_fail_before_any_computation() {
    let table = fixture_table(60);
    let request = TrainRequest {
        scope: Scope::Store,
        store: Some(77),
        dept: None,
        horizon: 12,
    };

    let err = run_training(&table, &request, &fast_settings()).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidInput(_)));
}

#[test]
fn test_out_of_range_horizon_rejected() {
    let table = fixture_table(60);
    let request = TrainRequest {
        scope: Scope::Overall,
        store: None,
        dept: None,
        horizon: 0,
    };

    let err = run_training(&table, &request, &fast_settings()).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidInput(_)));
}

#[test]
fn test_response_serializes_for_the_dashboard() {
    let table = fixture_table(60);
    let request = TrainRequest {
        scope: Scope::Overall,
        store: None,
        dept: None,
        horizon: 8,
    };

    let response = run_training(&table, &request, &fast_settings()).unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert!(json["summary"]["rows"].is_number());
    assert!(json["metrics"]["random_forest"]["mae"].is_number());
    assert!(json["predictions"].is_array());
    assert!(json["forecast"]["forecast"].is_array());
    assert_eq!(json["forecast"]["forecast"].as_array().unwrap().len(), 8);
}
