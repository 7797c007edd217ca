//! Per-column descriptive statistics.

use crate::utils::{
    ColumnKind, column_kind, mean, min_max, quantile_sorted, sorted_numeric_values, std_dev,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Descriptive statistics of a single column.
///
/// Numeric fields are `None` for non-numeric columns and for numeric columns
/// without any value. `std` is the sample standard deviation and needs at
/// least two values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name: String,
    pub dtype: String,
    pub kind: ColumnKind,
    /// Number of non-missing values
    pub count: usize,
    pub null_count: usize,
    /// Number of distinct non-missing values
    pub unique_count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStats {
    /// Percentage of missing cells in the column.
    pub fn null_percentage(&self) -> f64 {
        let total = self.count + self.null_count;
        if total == 0 {
            0.0
        } else {
            (self.null_count as f64 / total as f64) * 100.0
        }
    }
}

/// Compute the statistics of one column.
pub(crate) fn describe_column(series: &Series) -> PolarsResult<ColumnStats> {
    let null_count = series.null_count();
    let non_null = series.drop_nulls();
    let unique_count = if non_null.is_empty() {
        0
    } else {
        non_null.n_unique()?
    };
    let kind = column_kind(series.dtype());

    let mut stats = ColumnStats {
        name: series.name().to_string(),
        dtype: format!("{}", series.dtype()),
        kind,
        count: non_null.len(),
        null_count,
        unique_count,
        mean: None,
        std: None,
        min: None,
        q25: None,
        median: None,
        q75: None,
        max: None,
    };

    if kind == ColumnKind::Numeric {
        let sorted = sorted_numeric_values(series)?;
        stats.mean = mean(&sorted);
        stats.std = std_dev(&sorted, 1);
        if let Some((min, max)) = min_max(&sorted) {
            stats.min = Some(min);
            stats.max = Some(max);
        }
        stats.q25 = quantile_sorted(&sorted, 0.25);
        stats.median = quantile_sorted(&sorted, 0.5);
        stats.q75 = quantile_sorted(&sorted, 0.75);
    }

    Ok(stats)
}
