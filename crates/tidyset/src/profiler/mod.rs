//! Data profiling module.
//!
//! Produces a describe-style [`TableSummary`] of a table: overall shape,
//! duplicate and missing counts, and per-column statistics. Summaries are
//! taken before and after cleaning so the two can be compared.

mod statistics;

pub use statistics::ColumnStats;

use crate::cleaner::DuplicateRemover;
use crate::error::{Result, ResultExt};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Name of the label column of [`TableSummary::to_dataframe`].
pub const STATISTIC_COLUMN: &str = "statistic";

/// Row labels of [`TableSummary::to_dataframe`], in order.
pub const STATISTIC_LABELS: [&str; 10] = [
    "count", "null_count", "unique", "mean", "std", "min", "25%", "50%", "75%", "max",
];

/// Summary of a whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: usize,
    /// Rows identical to an earlier row
    pub duplicate_rows: usize,
    pub missing_cells: usize,
    pub column_summaries: Vec<ColumnStats>,
}

impl TableSummary {
    /// Percentage of cells that are missing.
    pub fn missing_percentage(&self) -> f64 {
        let cells = self.rows * self.columns;
        if cells == 0 {
            0.0
        } else {
            (self.missing_cells as f64 / cells as f64) * 100.0
        }
    }

    /// Look up the statistics of a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.column_summaries.iter().find(|c| c.name == name)
    }

    /// Render the summary as a table with one row per statistic and one
    /// Float64 column per source column. Statistics that do not apply to a
    /// column are null.
    ///
    /// Fails if a source column is itself named [`STATISTIC_COLUMN`].
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.column_summaries.len() + 1);
        columns.push(Column::new(STATISTIC_COLUMN.into(), STATISTIC_LABELS.to_vec()));

        for stats in &self.column_summaries {
            let values: Vec<Option<f64>> = vec![
                Some(stats.count as f64),
                Some(stats.null_count as f64),
                Some(stats.unique_count as f64),
                stats.mean,
                stats.std,
                stats.min,
                stats.q25,
                stats.median,
                stats.q75,
                stats.max,
            ];
            columns.push(Column::new(stats.name.as_str().into(), values));
        }

        DataFrame::new(columns)
    }
}

/// Data profiler for summarizing tables.
pub struct DataProfiler;

impl DataProfiler {
    /// Summarize a table.
    pub fn summarize(df: &DataFrame) -> Result<TableSummary> {
        let mut column_summaries = Vec::with_capacity(df.width());
        let mut missing_cells = 0;

        for column in df.get_columns() {
            let stats = statistics::describe_column(column.as_materialized_series())
                .context(format!("summarizing column '{}'", column.name()))?;
            missing_cells += stats.null_count;
            column_summaries.push(stats);
        }

        Ok(TableSummary {
            rows: df.height(),
            columns: df.width(),
            duplicate_rows: DuplicateRemover::count_duplicates(df)?,
            missing_cells,
            column_summaries,
        })
    }
}
