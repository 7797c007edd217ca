//! Statistical imputation methods.
//!
//! Series-level building blocks for mean, median and mode filling. Each
//! function returns a new Series and leaves its input alone.

use crate::utils::{mean, median_sorted, numeric_values, sorted_numeric_values};
use polars::prelude::*;

const MODE_VALUE_COLUMN: &str = "value";
const MODE_COUNT_COLUMN: &str = "count";

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Mean of the non-missing values of a numeric series.
    pub fn numeric_mean(series: &Series) -> PolarsResult<Option<f64>> {
        Ok(mean(&numeric_values(series)?))
    }

    /// Median of the non-missing values of a numeric series.
    pub fn numeric_median(series: &Series) -> PolarsResult<Option<f64>> {
        Ok(median_sorted(&sorted_numeric_values(series)?))
    }

    /// Fill the nulls of a numeric series with `fill_value`.
    ///
    /// The result is always Float64 since the fill value generally is not an
    /// integer.
    pub fn fill_numeric(series: &Series, fill_value: f64) -> PolarsResult<Series> {
        let float_series = series.cast(&DataType::Float64)?;
        let filled = float_series
            .f64()?
            .apply(|v| v.or(Some(fill_value)))
            .into_series();
        Ok(filled.with_name(series.name().clone()))
    }

    /// Fill the nulls of any series with its most frequent non-missing value.
    ///
    /// Values are counted with `value_counts` and ranked by count (descending)
    /// then value (ascending), so ties go to the smallest value. Returns the
    /// filled series (same dtype as the input) together with a printable form
    /// of the mode, or `None` when the series has no non-missing values.
    pub fn fill_mode(series: &Series) -> PolarsResult<Option<(Series, String)>> {
        let mut candidates = series.drop_nulls().with_name(MODE_VALUE_COLUMN.into());
        if candidates.dtype().is_float() {
            let not_nan = candidates.is_not_nan()?;
            candidates = candidates.filter(&not_nan)?;
        }
        if candidates.is_empty() {
            return Ok(None);
        }

        let ranked = candidates
            .value_counts(false, false, MODE_COUNT_COLUMN.into(), false)?
            .sort(
                [MODE_COUNT_COLUMN, MODE_VALUE_COLUMN],
                SortMultipleOptions::default().with_order_descending_multi([true, false]),
            )?;
        let values = ranked.column(MODE_VALUE_COLUMN)?.as_materialized_series();

        let label = values.get(0)?.str_value().to_string();
        let fill = values.new_from_index(0, series.len());
        let filled = series.zip_with(&series.is_not_null(), &fill)?;

        Ok(Some((filled, label)))
    }
}
