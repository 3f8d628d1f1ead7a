//! Time-bucketed aggregation of derived sales records.
//!
//! Rows are assigned a period key under the selected [`TimeMode`], grouped
//! through an ordered map, and summed in chronological key order. A row
//! whose period key cannot be derived drops out of bucketing but still
//! counts toward `total_revenue`, which is computed over the pre-bucketing
//! record set.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Datelike;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    data::{MONTH_ABBREVIATIONS, parse_flexible_date, parse_integer, parse_month_number},
    derive::SalesRecord,
    error::{SalesError, SalesResult},
    leaderboard,
    mapping::ColumnMapping,
    table::Table,
};

/// The rule used to assign each row to a time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeMode {
    Date,
    YearMonth,
    Year,
    Month,
}

impl TimeMode {
    /// Lenient coercion: anything that is not one of the four known modes
    /// falls back to `date`. Unknown input is never rejected.
    pub fn from_input(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "year_month" => TimeMode::YearMonth,
            "year" => TimeMode::Year,
            "month" => TimeMode::Month,
            _ => TimeMode::Date,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeMode::Date => "date",
            TimeMode::YearMonth => "year_month",
            TimeMode::Year => "year",
            TimeMode::Month => "month",
        }
    }

    /// Sentence fragment naming the column selections this mode needs,
    /// used in the `MissingTimeColumns` message.
    pub fn missing_columns_message(&self) -> &'static str {
        match self {
            TimeMode::Date => "Date mode requires a valid date column selection",
            TimeMode::YearMonth => {
                "Year + Month mode requires both year and month column selections"
            }
            TimeMode::Year => "Year mode requires a valid year column selection",
            TimeMode::Month => "Month mode requires a valid month column selection",
        }
    }
}

impl fmt::Display for TimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one aggregation run: chronologically ordered labels and
/// per-bucket sums, plus dataset-level revenue and best seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub total_revenue: f64,
    pub best_product: String,
}

fn column_index(table: &Table, role: &Option<String>, mode: TimeMode) -> SalesResult<usize> {
    role.as_deref()
        .and_then(|name| table.column_index(name))
        .ok_or(SalesError::MissingTimeColumns(mode))
}

/// Buckets `records` by period under `mode` and sums totals per bucket.
///
/// Grouping runs through a `BTreeMap` keyed on the period, so emission
/// order is ascending key order: chronological for `date`, `year_month`,
/// and `year`; calendar order 1-12 for `month` regardless of which months
/// appear or how often.
pub fn bucket_totals(
    records: &[SalesRecord],
    table: &Table,
    mode: TimeMode,
    mapping: &ColumnMapping,
) -> SalesResult<(Vec<String>, Vec<f64>)> {
    let (labels, values) = match mode {
        TimeMode::Date => {
            let date_idx = column_index(table, &mapping.date, mode)?;
            let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
            for record in records {
                if let Some(date) = parse_flexible_date(table.cell(record.row, date_idx)) {
                    *buckets.entry((date.year(), date.month())).or_insert(0.0) += record.total;
                }
            }
            split_buckets(buckets, |(year, month)| format!("{year:04}-{month:02}"))
        }
        TimeMode::YearMonth => {
            let year_idx = column_index(table, &mapping.year, mode)?;
            let month_idx = column_index(table, &mapping.month, mode)?;
            let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
            for record in records {
                let year = parse_integer(table.cell(record.row, year_idx));
                let month = parse_month_number(table.cell(record.row, month_idx));
                if let (Some(year), Some(month)) = (year, month) {
                    *buckets.entry((year, month)).or_insert(0.0) += record.total;
                }
            }
            split_buckets(buckets, |(year, month)| format!("{year:04}-{month:02}"))
        }
        TimeMode::Year => {
            let year_idx = column_index(table, &mapping.year, mode)?;
            let mut buckets: BTreeMap<i32, f64> = BTreeMap::new();
            for record in records {
                if let Some(year) = parse_integer(table.cell(record.row, year_idx)) {
                    *buckets.entry(year).or_insert(0.0) += record.total;
                }
            }
            split_buckets(buckets, |year| year.to_string())
        }
        TimeMode::Month => {
            let month_idx = column_index(table, &mapping.month, mode)?;
            let mut buckets: BTreeMap<u32, f64> = BTreeMap::new();
            for record in records {
                if let Some(month) = parse_month_number(table.cell(record.row, month_idx)) {
                    *buckets.entry(month).or_insert(0.0) += record.total;
                }
            }
            split_buckets(buckets, |month| {
                MONTH_ABBREVIATIONS[month as usize - 1].to_string()
            })
        }
    };

    if labels.is_empty() {
        return Err(SalesError::NoTimeValuesFound);
    }
    Ok((labels, values))
}

fn split_buckets<K, F>(buckets: BTreeMap<K, f64>, label: F) -> (Vec<String>, Vec<f64>)
where
    F: Fn(K) -> String,
{
    let mut labels = Vec::with_capacity(buckets.len());
    let mut values = Vec::with_capacity(buckets.len());
    for (key, sum) in buckets {
        labels.push(label(key));
        values.push(sum);
    }
    (labels, values)
}

/// Runs bucketing and the leaderboard over the derived records, producing
/// the full [`AggregationResult`].
pub fn summarize(
    records: &[SalesRecord],
    table: &Table,
    mode: TimeMode,
    mapping: &ColumnMapping,
) -> SalesResult<AggregationResult> {
    let (labels, values) = bucket_totals(records, table, mode, mapping)?;
    let total_revenue: f64 = records.iter().map(|r| r.total).sum();
    let best_product =
        leaderboard::select_best_product(records).ok_or(SalesError::NoValidRows)?;
    debug!(
        "Aggregated {} record(s) into {} bucket(s) under {mode} mode",
        records.len(),
        labels.len()
    );
    Ok(AggregationResult {
        labels,
        values,
        total_revenue,
        best_product,
    })
}
