//! Shared utilities for the cleaning pipeline.
//!
//! Column-type introspection and the small set of descriptive statistics the
//! stages and the profiler share. All statistics work on the finite,
//! non-missing values of a column. NaN and infinities are skipped so they
//! never leak into a fitted parameter, and the arithmetic below stays finite
//! for any finite input, including values near `f64::MAX`.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Kind of a column as far as the pipeline is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point numbers
    Numeric,
    /// Text, categorical, boolean, temporal or anything else
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Get the kind of a DataType.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Other
    }
}

/// Names of the numeric columns of a DataFrame, in column order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<PlSmallStr> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().clone())
        .collect()
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Collect the non-missing values of a numeric Series as f64.
///
/// Nulls, NaN and infinities are skipped. Returns an empty vector for
/// non-numeric input.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    if !is_numeric_dtype(series.dtype()) {
        return Ok(Vec::new());
    }
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect())
}

/// Collect and sort the non-missing values of a numeric Series.
pub fn sorted_numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let mut values = numeric_values(series)?;
    values.sort_by(f64::total_cmp);
    Ok(values)
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        Some(sum / n)
    } else {
        // The plain sum overflowed; divide first
        Some(values.iter().map(|v| v / n).sum())
    }
}

/// Median of an already sorted slice, `None` when empty.
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    quantile_sorted(sorted, 0.5)
}

/// Quantile of an already sorted slice using linear interpolation between the
/// closest ranks (position `q * (n - 1)`).
///
/// Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    let (a, b) = (sorted[lower], sorted[upper]);
    let diff = b - a;
    if diff.is_finite() {
        Some(a + diff * fraction)
    } else {
        Some(a * (1.0 - fraction) + b * fraction)
    }
}

/// Standard deviation with `ddof` delta degrees of freedom.
///
/// `ddof = 0` is the population deviation, `ddof = 1` the sample deviation.
/// Returns `None` when there are not more values than `ddof`.
pub fn std_dev(values: &[f64], ddof: usize) -> Option<f64> {
    half_std_dev(values, ddof).map(|half| 2.0 * half)
}

/// Half of [`std_dev`]. Always finite for finite input, whereas the full
/// deviation of values spread across the whole `f64` range is not.
pub fn half_std_dev(values: &[f64], ddof: usize) -> Option<f64> {
    if values.len() <= ddof {
        return None;
    }
    let mean = mean(values)?;
    let halves: Vec<f64> = values.iter().map(|v| v / 2.0 - mean / 2.0).collect();
    let largest = halves.iter().fold(0.0_f64, |acc, h| acc.max(h.abs()));
    if largest == 0.0 {
        return Some(0.0);
    }
    // Squares of the rescaled deviations are at most 1
    let sum_sq: f64 = halves.iter().map(|h| (h / largest).powi(2)).sum();
    Some(largest * (sum_sq / (values.len() - ddof) as f64).sqrt())
}

/// Minimum and maximum of a slice, `None` when empty.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

// =============================================================================
// Tests
// =============================================================================
