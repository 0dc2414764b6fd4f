//! Raw sales data handling
//!
//! Typed records replace the untyped table flow of the reference
//! implementation: the CSV boundary validates and converts once, and
//! everything downstream works with [`SalesRecord`] collections and
//! derived [`WeeklySeries`] aggregates.

use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// Required raw columns, with the exact (case-sensitive) names the
/// upload contract specifies.
pub const REQUIRED_COLUMNS: [&str; 4] = ["Store", "Dept", "Date", "Weekly_Sales"];

/// Optional holiday indicator column
pub const HOLIDAY_COLUMN: &str = "IsHoliday";

/// One raw observation: weekly sales of a department in a store.
///
/// Duplicate (store, dept, date) rows are tolerated and never
/// deduplicated; `weekly_sales` may be zero or negative in raw data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub store: u32,
    pub dept: u32,
    pub date: NaiveDate,
    pub weekly_sales: f64,
    pub is_holiday: bool,
}

/// Aggregation granularity for forecasting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// The whole store network
    Overall,
    /// One store across its departments
    Store,
    /// One department across stores
    Department,
}

impl FromStr for Scope {
    type Err = ForecastError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "overall" | "all" | "network" => Ok(Scope::Overall),
            "store" | "stores" => Ok(Scope::Store),
            "department" | "departments" | "dept" | "depts" => Ok(Scope::Department),
            other => Err(ForecastError::InvalidInput(format!(
                "Unknown scope '{}'; expected overall, store, or department",
                other
            ))),
        }
    }
}

/// A date-tagged value, serialized with an ISO `YYYY-MM-DD` date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: f64,
}

/// Owned collection of raw sales records
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

/// Loader for raw sales tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a sales table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesTable> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(&df)
    }

    /// Convert an existing DataFrame into a validated sales table.
    ///
    /// Fails fast with a [`ForecastError::MissingColumn`] before touching
    /// any values when a required column is absent.
    pub fn from_dataframe(df: &DataFrame) -> Result<SalesTable> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        for required in REQUIRED_COLUMNS {
            if !names.iter().any(|n| n == required) {
                return Err(ForecastError::MissingColumn(required.to_string()));
            }
        }

        let stores = integer_column(df, "Store")?;
        let depts = integer_column(df, "Dept")?;
        let dates = date_column(df, "Date")?;
        let sales = float_column(df, "Weekly_Sales")?;
        let holidays = if names.iter().any(|n| n == HOLIDAY_COLUMN) {
            bool_column(df, HOLIDAY_COLUMN)?
        } else {
            vec![false; df.height()]
        };

        let records = (0..df.height())
            .map(|i| SalesRecord {
                store: stores[i],
                dept: depts[i],
                date: dates[i],
                weekly_sales: sales[i],
                is_holiday: holidays[i],
            })
            .collect();

        Ok(SalesTable::new(records))
    }
}

impl SalesTable {
    /// Create a table from records
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    /// The underlying records
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct store identifiers, ascending
    pub fn store_ids(&self) -> BTreeSet<u32> {
        self.records.iter().map(|r| r.store).collect()
    }

    /// Distinct department identifiers, ascending
    pub fn dept_ids(&self) -> BTreeSet<u32> {
        self.records.iter().map(|r| r.dept).collect()
    }

    /// Copy of the records sorted by (store, dept, date) ascending, the
    /// order every shift-style operation requires.
    pub fn sorted_by_group_and_date(&self) -> Vec<SalesRecord> {
        let mut sorted = self.records.clone();
        sorted.sort_by(|a, b| {
            (a.store, a.dept, a.date).cmp(&(b.store, b.dept, b.date))
        });
        sorted
    }

    /// Restrict to a forecasting scope.
    ///
    /// `Overall` keeps everything; `Store` and `Department` require the
    /// respective identifier and fail with an input error when it is
    /// missing or not present in the data.
    pub fn filter_scope(
        &self,
        scope: Scope,
        store: Option<u32>,
        dept: Option<u32>,
    ) -> Result<SalesTable> {
        match scope {
            Scope::Overall => Ok(self.clone()),
            Scope::Store => {
                let id = store.ok_or_else(|| {
                    ForecastError::InvalidInput(
                        "Scope 'store' requires a store_id".to_string(),
                    )
                })?;
                if !self.store_ids().contains(&id) {
                    return Err(ForecastError::InvalidInput(format!(
                        "Store {} not present in data",
                        id
                    )));
                }
                Ok(SalesTable::new(
                    self.records.iter().filter(|r| r.store == id).cloned().collect(),
                ))
            }
            Scope::Department => {
                let id = dept.ok_or_else(|| {
                    ForecastError::InvalidInput(
                        "Scope 'department' requires a dept_id".to_string(),
                    )
                })?;
                if !self.dept_ids().contains(&id) {
                    return Err(ForecastError::InvalidInput(format!(
                        "Department {} not present in data",
                        id
                    )));
                }
                Ok(SalesTable::new(
                    self.records.iter().filter(|r| r.dept == id).cloned().collect(),
                ))
            }
        }
    }

    /// Records for exactly one (store, dept) pair, sorted by date
    pub fn filter_pair(&self, store: u32, dept: u32) -> Vec<SalesRecord> {
        let mut records: Vec<SalesRecord> = self
            .records
            .iter()
            .filter(|r| r.store == store && r.dept == dept)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.date);
        records
    }

    /// Aggregate to one weekly, gap-filled series.
    ///
    /// Records are binned into 7-day buckets anchored on the earliest
    /// date, sales are summed per bucket, and buckets with no records
    /// become 0.0 — the result has a strictly increasing date index at a
    /// fixed weekly step with no gaps.
    pub fn weekly_totals(&self) -> Result<WeeklySeries> {
        let start = self
            .records
            .iter()
            .map(|r| r.date)
            .min()
            .ok_or_else(|| {
                ForecastError::InsufficientData("No records to aggregate".to_string())
            })?;
        let end = self.records.iter().map(|r| r.date).max().unwrap_or(start);

        let buckets = ((end - start).num_days() / 7) as usize + 1;
        let mut values = vec![0.0; buckets];
        for record in &self.records {
            let bucket = ((record.date - start).num_days() / 7) as usize;
            values[bucket] += record.weekly_sales;
        }

        Ok(WeeklySeries { start, values })
    }
}

/// A weekly-frequency, gap-filled series of summed sales
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySeries {
    start: NaiveDate,
    values: Vec<f64>,
}

impl WeeklySeries {
    /// Build a series directly from its anchor date and values
    pub fn new(start: NaiveDate, values: Vec<f64>) -> Self {
        Self { start, values }
    }

    /// Number of weekly periods
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series holds no periods
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The summed values, one per week
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Date of period `index`
    pub fn date_at(&self, index: usize) -> NaiveDate {
        self.start + Duration::days(7 * index as i64)
    }

    /// Date of the final period
    pub fn last_date(&self) -> Option<NaiveDate> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.date_at(self.values.len() - 1))
        }
    }

    /// The most recent `n` periods as date-tagged values
    pub fn tail(&self, n: usize) -> Vec<DatedValue> {
        let skip = self.values.len().saturating_sub(n);
        self.values
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, &value)| DatedValue {
                date: self.date_at(i),
                value,
            })
            .collect()
    }

    /// The first `horizon` weekly dates after the series ends
    pub fn future_dates(&self, horizon: usize) -> Vec<NaiveDate> {
        let base = self.values.len();
        (0..horizon)
            .map(|i| self.date_at(base + i))
            .collect()
    }
}

fn series_error(column: &str, detail: &str) -> ForecastError {
    ForecastError::InvalidInput(format!("Column '{}': {}", column, detail))
}

fn integer_column(df: &DataFrame, name: &str) -> Result<Vec<u32>> {
    let col = df.column(name)?;
    let values: Vec<Option<i64>> = match col.dtype() {
        DataType::Int64 => col.i64()?.into_iter().collect(),
        DataType::Int32 => col.i32()?.into_iter().map(|v| v.map(i64::from)).collect(),
        DataType::UInt32 => col.u32()?.into_iter().map(|v| v.map(i64::from)).collect(),
        DataType::UInt64 => col
            .u64()?
            .into_iter()
            .map(|v| v.map(|x| x as i64))
            .collect(),
        other => {
            return Err(series_error(
                name,
                &format!("expected an integer column, found {:?}", other),
            ))
        }
    };

    values
        .into_iter()
        .map(|v| match v {
            Some(x) if x >= 0 && x <= u32::MAX as i64 => Ok(x as u32),
            Some(x) => Err(series_error(name, &format!("identifier {} out of range", x))),
            None => Err(series_error(name, "contains null values")),
        })
        .collect()
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let col = df.column(name)?;
    let values: Vec<Option<f64>> = match col.dtype() {
        DataType::Float64 => col.f64()?.into_iter().collect(),
        DataType::Float32 => col.f32()?.into_iter().map(|v| v.map(f64::from)).collect(),
        DataType::Int64 => col.i64()?.into_iter().map(|v| v.map(|x| x as f64)).collect(),
        DataType::Int32 => col.i32()?.into_iter().map(|v| v.map(f64::from)).collect(),
        other => {
            return Err(series_error(
                name,
                &format!("expected a numeric column, found {:?}", other),
            ))
        }
    };

    values
        .into_iter()
        .map(|v| v.ok_or_else(|| series_error(name, "contains null values")))
        .collect()
}

fn date_column(df: &DataFrame, name: &str) -> Result<Vec<NaiveDate>> {
    let col = df.column(name)?;
    match col.dtype() {
        DataType::Date => col
            .date()?
            .into_iter()
            .map(|v| match v {
                Some(days) => Ok(epoch() + Duration::days(days as i64)),
                None => Err(series_error(name, "contains null values")),
            })
            .collect(),
        DataType::Utf8 => col
            .utf8()?
            .into_iter()
            .map(|v| match v {
                Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map_err(|_| series_error(name, &format!("unparseable date '{}'", text))),
                None => Err(series_error(name, "contains null values")),
            })
            .collect(),
        other => Err(series_error(
            name,
            &format!("expected a date column, found {:?}", other),
        )),
    }
}

fn bool_column(df: &DataFrame, name: &str) -> Result<Vec<bool>> {
    let col = df.column(name)?;
    match col.dtype() {
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.ok_or_else(|| series_error(name, "contains null values")))
            .collect(),
        DataType::Utf8 => col
            .utf8()?
            .into_iter()
            .map(|v| match v {
                Some(text) => match text.trim().to_lowercase().as_str() {
                    "true" | "1" => Ok(true),
                    "false" | "0" => Ok(false),
                    other => Err(series_error(name, &format!("unparseable flag '{}'", other))),
                },
                None => Err(series_error(name, "contains null values")),
            })
            .collect(),
        DataType::Int64 => col
            .i64()?
            .into_iter()
            .map(|v| match v {
                Some(x) => Ok(x != 0),
                None => Err(series_error(name, "contains null values")),
            })
            .collect(),
        other => Err(series_error(
            name,
            &format!("expected a boolean column, found {:?}", other),
        )),
    }
}

fn epoch() -> NaiveDate {
    // Polars date columns count days from 1970-01-01.
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}
