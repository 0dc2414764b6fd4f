use assert_approx_eq::assert_approx_eq;
use chrono::{Duration, NaiveDate};
use rstest::rstest;
use sales_forecast::data::{SalesRecord, SalesTable};
use sales_forecast::error::ForecastError;
use sales_forecast::residuals::residual_diagnostics;

fn series_table(store: u32, dept: u32, sales: &[f64]) -> SalesTable {
    let start = NaiveDate::from_ymd_opt(2011, 1, 7).unwrap();
    let records = sales
        .iter()
        .enumerate()
        .map(|(i, &value)| SalesRecord {
            store,
            dept,
            date: start + Duration::days(7 * i as i64),
            weekly_sales: value,
            is_holiday: false,
        })
        .collect();
    SalesTable::new(records)
}

#[test]
fn test_residuals_against_naive_previous_week() {
    let table = series_table(1, 1, &[100.0, 120.0, 90.0, 130.0, 110.0]);
    let report = residual_diagnostics(&table, 1, 1, 0.5).unwrap();

    // First naive prediction is 0, the rest are the previous actuals.
    let train: Vec<f64> = report.train_residuals.iter().map(|p| p.value).collect();
    assert_eq!(train, vec![100.0, 20.0, -30.0, 40.0]);

    let valid: Vec<f64> = report.valid_residuals.iter().map(|p| p.value).collect();
    assert_eq!(valid, vec![-20.0]);
}

#[test]
fn test_split_sizes_use_integer_floor() {
    let table = series_table(1, 1, &[10.0; 9]);
    let report = residual_diagnostics(&table, 1, 1, 0.3).unwrap();

    // floor(9 * 0.8) = 7 train rows, 2 validation rows
    assert_eq!(report.train_residuals.len(), 7);
    assert_eq!(report.valid_residuals.len(), 2);
    assert_eq!(report.smoothed_train.len(), 7);
    assert_eq!(report.smoothed_forecast.len(), 2);
}

#[test]
fn test_validation_smoothing_is_a_continuation() {
    let table = series_table(1, 1, &[50.0, 80.0, 20.0, 60.0, 40.0, 70.0, 30.0, 90.0, 10.0, 55.0]);
    let alpha = 0.4;
    let report = residual_diagnostics(&table, 1, 1, alpha).unwrap();

    // smoothed_forecast[0] = alpha * valid[0] + (1 - alpha) * last smoothed train
    let seed = report.smoothed_train.last().unwrap().value;
    let first_valid = report.valid_residuals[0].value;
    let expected = alpha * first_valid + (1.0 - alpha) * seed;
    assert_approx_eq!(report.smoothed_forecast[0].value, expected, 1e-12);
}

#[test]
fn test_earlier_training_values_reach_the_forecast_seed() {
    let base: Vec<f64> = vec![50.0, 80.0, 20.0, 60.0, 40.0, 70.0, 30.0, 90.0, 10.0, 55.0];
    let mut moved = base.clone();
    moved[2] += 100.0;

    let report_a = residual_diagnostics(&series_table(1, 1, &base), 1, 1, 0.4).unwrap();
    let report_b = residual_diagnostics(&series_table(1, 1, &moved), 1, 1, 0.4).unwrap();

    // A perturbation well before the boundary still shifts the first
    // continuation value, but its influence has decayed by the last one.
    let first_shift =
        (report_a.smoothed_forecast[0].value - report_b.smoothed_forecast[0].value).abs();
    let last_shift = (report_a.smoothed_forecast.last().unwrap().value
        - report_b.smoothed_forecast.last().unwrap().value)
        .abs();
    assert!(first_shift > 1e-9);
    assert!(last_shift < first_shift);
}

#[test]
fn test_zero_sales_series_is_all_zero() {
    let table = series_table(3, 7, &[0.0; 20]);
    let report = residual_diagnostics(&table, 3, 7, 0.2).unwrap();

    for series in [
        &report.train_residuals,
        &report.valid_residuals,
        &report.smoothed_train,
        &report.smoothed_forecast,
    ] {
        assert!(series.iter().all(|p| p.value == 0.0));
    }
}

#[test]
fn test_constant_sales_settle_to_zero_residuals() {
    let table = series_table(1, 1, &[500.0; 15]);
    let report = residual_diagnostics(&table, 1, 1, 0.2).unwrap();

    // Only the very first residual carries the level (no prior week);
    // everything after it is exactly zero.
    assert_eq!(report.train_residuals[0].value, 500.0);
    assert!(report.train_residuals[1..].iter().all(|p| p.value == 0.0));
    assert!(report.valid_residuals.iter().all(|p| p.value == 0.0));
}

#[test]
fn test_alpha_one_disables_smoothing() {
    let table = series_table(1, 1, &[10.0, 30.0, 15.0, 45.0, 25.0]);
    let report = residual_diagnostics(&table, 1, 1, 1.0).unwrap();

    for (smoothed, raw) in report.smoothed_train.iter().zip(report.train_residuals.iter()) {
        assert_eq!(smoothed.value, raw.value);
    }
    for (smoothed, raw) in report.smoothed_forecast.iter().zip(report.valid_residuals.iter()) {
        assert_eq!(smoothed.value, raw.value);
    }
}

#[rstest]
#[case(0.0)]
#[case(-0.2)]
#[case(1.5)]
fn test_out_of_range_alpha_rejected(#[case] alpha: f64) {
    let table = series_table(1, 1, &[10.0; 10]);
    let err = residual_diagnostics(&table, 1, 1, alpha).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidInput(_)));
}

#[test]
fn test_unknown_pair_rejected() {
    let table = series_table(1, 1, &[10.0; 10]);
    let err = residual_diagnostics(&table, 2, 9, 0.5).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidInput(_)));
}

#[test]
fn test_diagnostics_are_deterministic() {
    let sales: Vec<f64> = (0..40).map(|i| 100.0 + ((i * 13) % 29) as f64).collect();
    let a = residual_diagnostics(&series_table(1, 1, &sales), 1, 1, 0.25).unwrap();
    let b = residual_diagnostics(&series_table(1, 1, &sales), 1, 1, 0.25).unwrap();

    let values = |r: &sales_forecast::residuals::ResidualReport| {
        r.smoothed_forecast.iter().map(|p| p.value).collect::<Vec<f64>>()
    };
    assert_eq!(values(&a), values(&b));
}

#[test]
fn test_dates_serialize_fixed_width() {
    let table = series_table(1, 1, &[10.0; 10]);
    let report = residual_diagnostics(&table, 1, 1, 0.5).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    let first = json["trainResiduals"][0]["date"].as_str().unwrap();
    assert_eq!(first, "2011-01-07");
    assert_eq!(first.len(), 10);
}
