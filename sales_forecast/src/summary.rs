//! Descriptive statistics for the dashboard
//!
//! Dataset-level summary plus top-N store and department totals.

use crate::data::SalesTable;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use sales_math::metrics::round_to;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// High-level description of a loaded dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub stores: usize,
    pub departments: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub avg_sales: f64,
}

/// One entry of a descending top-N aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTotal {
    pub name: String,
    pub value: f64,
}

/// Summarize a dataset.
pub fn dataset_summary(table: &SalesTable) -> Result<DatasetSummary> {
    let records = table.records();
    let first_date = records.iter().map(|r| r.date).min().ok_or_else(|| {
        ForecastError::InsufficientData("Cannot summarize an empty table".to_string())
    })?;
    let last_date = records.iter().map(|r| r.date).max().unwrap_or(first_date);

    let avg_sales = records.iter().map(|r| r.weekly_sales).mean();

    Ok(DatasetSummary {
        rows: records.len(),
        stores: table.store_ids().len(),
        departments: table.dept_ids().len(),
        first_date,
        last_date,
        avg_sales: round_to(avg_sales, 2),
    })
}

/// Stores ranked by total sales, descending, truncated to `n`.
pub fn top_stores(table: &SalesTable, n: usize) -> Vec<RankedTotal> {
    ranked_totals(table, n, |record| (record.store, "Store"))
}

/// Departments ranked by total sales, descending, truncated to `n`.
pub fn top_departments(table: &SalesTable, n: usize) -> Vec<RankedTotal> {
    ranked_totals(table, n, |record| (record.dept, "Dept"))
}

fn ranked_totals(
    table: &SalesTable,
    n: usize,
    key: impl Fn(&crate::data::SalesRecord) -> (u32, &'static str),
) -> Vec<RankedTotal> {
    let mut totals: BTreeMap<u32, f64> = BTreeMap::new();
    let mut label = "";
    for record in table.records() {
        let (id, prefix) = key(record);
        label = prefix;
        *totals.entry(id).or_insert(0.0) += record.weekly_sales;
    }

    let mut ranked: Vec<RankedTotal> = totals
        .into_iter()
        .map(|(id, value)| RankedTotal {
            name: format!("{} {}", label, id),
            value: round_to(value, 2),
        })
        .collect();
    // Descending by value; ties keep ascending id order from the map.
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(n);
    ranked
}
