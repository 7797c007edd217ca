//! Normalization stage.
//!
//! Rescales numeric columns in place of their original values:
//!
//! ```text
//! min-max:  x' = (x - min) / (max - min)
//! z-score:  x' = (x - mean) / std        (population std, ddof = 0)
//! ```
//!
//! Parameters are fitted on the column's own finite, non-missing values each
//! time the stage runs. When the denominator is exactly zero (a constant
//! column) every finite value maps to [`ZERO_SPREAD_FALLBACK`]. NaN and
//! infinities are left as they are and do not take part in the fit.

use crate::config::NormalizeMethod;
use crate::error::Result;
use crate::pipeline::{CleaningStage, Stage};
use crate::types::CleaningAction;
use crate::utils::{half_std_dev, mean, min_max, numeric_column_names, numeric_values};
use polars::prelude::*;
use tracing::{debug, warn};

/// Value assigned to every non-missing cell of a column with zero spread.
pub const ZERO_SPREAD_FALLBACK: f64 = 0.0;

/// Affine rescaling fitted to one column: `x' = (x - offset) / scale`.
///
/// Half the scale is stored and the transform works on halved operands, so
/// neither `max - min` nor `x - offset` can overflow for finite input. A
/// `half_scale` of zero marks a constant column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingParams {
    pub offset: f64,
    pub half_scale: f64,
}

impl ScalingParams {
    /// Fit parameters for `method` on finite values.
    ///
    /// Returns `None` when there are no values or the method is `None`.
    pub fn fit(method: NormalizeMethod, values: &[f64]) -> Option<Self> {
        match method {
            NormalizeMethod::None => None,
            NormalizeMethod::MinMax => {
                let (min, max) = min_max(values)?;
                Some(Self {
                    offset: min,
                    half_scale: max / 2.0 - min / 2.0,
                })
            }
            NormalizeMethod::ZScore => {
                let (min, max) = min_max(values)?;
                // The mean of a constant column can round away from its value
                let half_scale = if min == max {
                    0.0
                } else {
                    half_std_dev(values, 0)?
                };
                Some(Self {
                    offset: mean(values)?,
                    half_scale,
                })
            }
        }
    }

    /// The full denominator. May be infinite for extreme columns; only used
    /// for display.
    pub fn scale(&self) -> f64 {
        2.0 * self.half_scale
    }

    /// Whether the column is constant.
    pub fn is_degenerate(&self) -> bool {
        self.half_scale == 0.0
    }

    /// Rescale a single value. Non-finite values pass through.
    pub fn transform(&self, value: f64) -> f64 {
        if !value.is_finite() {
            value
        } else if self.is_degenerate() {
            ZERO_SPREAD_FALLBACK
        } else {
            (value / 2.0 - self.offset / 2.0) / self.half_scale
        }
    }
}

/// Rescales numeric columns using a [`NormalizeMethod`].
///
/// Non-numeric columns and numeric columns without any value are returned
/// unchanged. Normalized columns are Float64; nulls stay null.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    method: NormalizeMethod,
}

impl Normalizer {
    /// Create a normalizer for the given method.
    pub fn new(method: NormalizeMethod) -> Self {
        Self { method }
    }

    /// The configured method.
    pub fn method(&self) -> NormalizeMethod {
        self.method
    }

    fn normalize_series(series: &Series, params: ScalingParams) -> PolarsResult<Series> {
        let float_series = series.cast(&DataType::Float64)?;
        Ok(float_series
            .f64()?
            .apply(|v| v.map(|val| params.transform(val)))
            .into_series()
            .with_name(series.name().clone()))
    }
}

impl Stage for Normalizer {
    fn kind(&self) -> CleaningStage {
        CleaningStage::Normalization
    }

    fn transform(&self, df: &DataFrame, actions: &mut Vec<CleaningAction>) -> Result<DataFrame> {
        if self.method == NormalizeMethod::None {
            return Ok(df.clone());
        }

        let mut out = df.clone();

        for name in numeric_column_names(df) {
            let series = df.column(name.as_str())?.as_materialized_series();
            let values = numeric_values(series)?;

            let Some(params) = ScalingParams::fit(self.method, &values) else {
                debug!("Column '{}' has no values to normalize; skipped", name);
                continue;
            };

            let normalized = Self::normalize_series(series, params)?;
            out.replace(name.as_str(), normalized)?;

            if params.is_degenerate() {
                warn!(
                    "Column '{}' has zero spread; {} normalization set it to {}",
                    name, self.method, ZERO_SPREAD_FALLBACK
                );
                actions.push(CleaningAction::fallback(
                    CleaningStage::Normalization,
                    name.as_str(),
                    format!(
                        "Constant column: all values set to {} ({})",
                        ZERO_SPREAD_FALLBACK, self.method
                    ),
                ));
            } else {
                debug!(
                    "Normalized '{}' with {} (offset={:.4}, scale={:.4})",
                    name, self.method, params.offset, params.scale()
                );
                actions.push(CleaningAction::new(
                    CleaningStage::Normalization,
                    name.as_str(),
                    format!("Applied {} normalization", self.method),
                ));
            }
        }

        Ok(out)
    }
}
