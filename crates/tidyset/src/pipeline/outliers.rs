//! Outlier clipping stage.
//!
//! Numeric columns are clipped (not filtered) to the Tukey fences
//! `[Q1 - 1.5 * IQR, Q3 + 1.5 * IQR]`, so the row count never changes.
//! The quartiles come from the finite values only; an infinite value is
//! always outside the fences and is clipped like any other outlier.

use crate::error::Result;
use crate::pipeline::{CleaningStage, Stage};
use crate::types::CleaningAction;
use crate::utils::{numeric_column_names, quantile_sorted, sorted_numeric_values};
use polars::prelude::*;
use tracing::debug;

/// Multiplier applied to the IQR to obtain the fences.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Lower and upper clipping bounds of a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Compute the bounds from a sorted slice of finite values.
    ///
    /// Returns `None` when the slice is empty.
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        let q1 = quantile_sorted(sorted, 0.25)?;
        let q3 = quantile_sorted(sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - IQR_MULTIPLIER * iqr,
            upper: q3 + IQR_MULTIPLIER * iqr,
        })
    }

    /// Whether a value lies outside the bounds.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Clips every numeric column to its IQR bounds.
///
/// Columns with no non-missing values are skipped, as are columns where no
/// value lies outside the bounds; those keep their original dtype. Clipped
/// columns become Float64. Nulls stay null.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlierClipper;

impl OutlierClipper {
    /// Create a new outlier clipper.
    pub fn new() -> Self {
        Self
    }

    /// Clip a single series. Returns the clipped series and how many values
    /// were moved, or `None` when there is nothing to clip.
    fn clip_series(series: &Series) -> PolarsResult<Option<(Series, usize, IqrBounds)>> {
        let sorted = sorted_numeric_values(series)?;
        let Some(bounds) = IqrBounds::from_sorted(&sorted) else {
            return Ok(None);
        };

        let float_series = series.cast(&DataType::Float64)?;
        let values = float_series.f64()?;
        let clipped_count = values
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan() && bounds.is_outlier(*v))
            .count();
        if clipped_count == 0 {
            return Ok(None);
        }

        let (lower, upper) = (bounds.lower, bounds.upper);
        let clipped = values
            .apply(|v| v.map(|val| if val.is_nan() { val } else { val.clamp(lower, upper) }))
            .into_series()
            .with_name(series.name().clone());

        Ok(Some((clipped, clipped_count, bounds)))
    }
}

impl Stage for OutlierClipper {
    fn kind(&self) -> CleaningStage {
        CleaningStage::OutlierClipping
    }

    fn transform(&self, df: &DataFrame, actions: &mut Vec<CleaningAction>) -> Result<DataFrame> {
        let mut out = df.clone();
        let mut total_clipped = 0;

        for name in numeric_column_names(df) {
            let series = df.column(name.as_str())?.as_materialized_series();

            match Self::clip_series(series)? {
                Some((clipped, count, bounds)) => {
                    out.replace(name.as_str(), clipped)?;
                    total_clipped += count;
                    debug!(
                        "Clipped {} values in '{}' to [{:.4}, {:.4}] (Q1={:.4}, Q3={:.4})",
                        count, name, bounds.lower, bounds.upper, bounds.q1, bounds.q3
                    );
                    actions.push(CleaningAction::new(
                        CleaningStage::OutlierClipping,
                        name.as_str(),
                        format!(
                            "Clipped {} outliers to [{:.2}, {:.2}]",
                            count, bounds.lower, bounds.upper
                        ),
                    ));
                }
                None => {
                    debug!("No outliers to clip in '{}'", name);
                }
            }
        }

        debug!("Clipped {} outliers in total", total_clipped);
        Ok(out)
    }
}
