use chrono::{Duration, NaiveDate};
use rstest::rstest;
use sales_forecast::config::SeasonalityPolicy;
use sales_forecast::data::{SalesRecord, SalesTable, Scope};
use sales_forecast::error::ForecastError;
use sales_forecast::seasonal::{forecast, select_model, ModelChoice};
use std::f64::consts::PI;

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 2, 5).unwrap()
}

fn store_records(store: u32, weeks: usize, base: f64, step: f64) -> Vec<SalesRecord> {
    (0..weeks)
        .map(|i| SalesRecord {
            store,
            dept: 1,
            date: start_date() + Duration::days(7 * i as i64),
            weekly_sales: base + step * i as f64,
            is_holiday: false,
        })
        .collect()
}

fn yearly_cycle(weeks: usize) -> Vec<f64> {
    (0..weeks)
        .map(|i| 10_000.0 + 2_000.0 * (2.0 * PI * i as f64 / 52.0).sin())
        .collect()
}

#[test]
fn test_store_scope_end_to_end() {
    // Two stores with distinct levels; store 1 grows by a known weekly
    // increment.
    let mut records = store_records(1, 60, 1_000.0, 50.0);
    records.extend(store_records(2, 60, 9_000.0, 0.0));
    let table = SalesTable::new(records);

    let outcome = forecast(
        &table,
        Scope::Store,
        Some(1),
        None,
        12,
        &SeasonalityPolicy::default(),
    )
    .unwrap();

    assert_eq!(outcome.forecast.len(), 12);

    // Forecast dates continue the history at strict 7-day steps.
    let last_historical = start_date() + Duration::days(7 * 59);
    let mut previous = last_historical;
    for point in &outcome.forecast {
        assert_eq!(point.date - previous, Duration::days(7));
        assert!(point.value >= 0.0);
        previous = point.date;
    }

    // 60 periods >= 3 * 12, so held-out metrics are present.
    assert!(outcome.metrics.is_some());

    // History covers at most 52 periods and ends at the last actual.
    assert_eq!(outcome.history.len(), 52);
    assert_eq!(outcome.history.last().unwrap().date, last_historical);
}

#[test]
fn test_short_series_skips_evaluation() {
    let table = SalesTable::new(store_records(1, 30, 5_000.0, 10.0));
    let outcome = forecast(
        &table,
        Scope::Overall,
        None,
        None,
        12,
        &SeasonalityPolicy::default(),
    )
    .unwrap();

    // 30 < 3 * 12: fit on the full series, no metrics.
    assert!(outcome.metrics.is_none());
    assert_eq!(outcome.forecast.len(), 12);
    assert_eq!(outcome.history.len(), 30);
}

#[test]
fn test_declining_series_is_clipped_at_zero() {
    let table = SalesTable::new(store_records(1, 30, 300.0, -10.0));
    let outcome = forecast(
        &table,
        Scope::Overall,
        None,
        None,
        12,
        &SeasonalityPolicy::default(),
    )
    .unwrap();

    // The raw autoregressive forecast keeps falling below zero; every
    // reported value must be clipped.
    assert!(outcome.forecast.iter().all(|p| p.value >= 0.0));
    assert!(outcome.forecast.iter().any(|p| p.value == 0.0));
}

#[test]
fn test_insufficient_periods_is_recoverable() {
    let table = SalesTable::new(store_records(1, 10, 5_000.0, 0.0));
    let err = forecast(
        &table,
        Scope::Overall,
        None,
        None,
        12,
        &SeasonalityPolicy::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ForecastError::InsufficientData(_)));
    assert!(err.is_recoverable());
}

#[rstest]
#[case(0)]
#[case(53)]
fn test_out_of_range_horizon_rejected(#[case] horizon: usize) {
    let table = SalesTable::new(store_records(1, 60, 5_000.0, 0.0));
    let err = forecast(
        &table,
        Scope::Overall,
        None,
        None,
        horizon,
        &SeasonalityPolicy::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ForecastError::InvalidInput(_)));
}

#[test]
fn test_unknown_store_rejected_for_store_scope() {
    let table = SalesTable::new(store_records(1, 60, 5_000.0, 0.0));
    let err = forecast(
        &table,
        Scope::Store,
        Some(42),
        None,
        12,
        &SeasonalityPolicy::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ForecastError::InvalidInput(_)));
}

#[test]
fn test_seasonal_path_needs_exactly_three_seasons() {
    let policy = SeasonalityPolicy::default();

    // A clean yearly cycle has lag-52 autocorrelation well above 0.3.
    let at_threshold = yearly_cycle(156);
    assert_eq!(
        select_model(&at_threshold, &policy).unwrap(),
        ModelChoice::Seasonal
    );

    // One period short: never seasonal, regardless of autocorrelation.
    let one_short = yearly_cycle(155);
    assert_eq!(
        select_model(&one_short, &policy).unwrap(),
        ModelChoice::NonSeasonal
    );
}

#[test]
fn test_weak_autocorrelation_stays_non_seasonal() {
    // A period-3 cycle sampled at lag 52 lands one phase off, giving a
    // lag-52 autocorrelation near -0.5 — well under the threshold.
    let cycle = [9_000.0, 10_000.0, 11_000.0];
    let series: Vec<f64> = (0..200).map(|i| cycle[i % 3]).collect();
    let policy = SeasonalityPolicy::default();
    assert_eq!(
        select_model(&series, &policy).unwrap(),
        ModelChoice::NonSeasonal
    );
}

#[test]
fn test_seasonal_forecast_end_to_end() {
    let values = yearly_cycle(156);
    let records: Vec<SalesRecord> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| SalesRecord {
            store: 1,
            dept: 1,
            date: start_date() + Duration::days(7 * i as i64),
            weekly_sales: v,
            is_holiday: false,
        })
        .collect();
    let table = SalesTable::new(records);

    let outcome = forecast(
        &table,
        Scope::Overall,
        None,
        None,
        26,
        &SeasonalityPolicy::default(),
    )
    .unwrap();

    assert_eq!(outcome.forecast.len(), 26);
    assert!(outcome.metrics.is_some());
    assert!(outcome.forecast.iter().all(|p| p.value.is_finite() && p.value >= 0.0));
}
