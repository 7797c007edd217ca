//! The missing-value stage.

use crate::cleaner::drop_incomplete_rows;
use crate::config::MissingStrategy;
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::pipeline::{CleaningStage, Stage};
use crate::types::CleaningAction;
use crate::utils::numeric_column_names;
use polars::prelude::*;
use tracing::{debug, warn};

/// Imputes or drops missing values according to a [`MissingStrategy`].
///
/// - `DropRows` removes every row with a null in any column.
/// - `Mean` / `Median` fill numeric columns only; other columns keep their
///   nulls. A numeric column without any value stays all-missing.
/// - `Mode` fills every column, numeric or not, with its most frequent value,
///   ties going to the smallest value. The column dtype is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingValueHandler {
    strategy: MissingStrategy,
}

#[derive(Debug, Clone, Copy)]
enum Statistic {
    Mean,
    Median,
}

impl Statistic {
    fn name(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
        }
    }
}

impl MissingValueHandler {
    /// Create a handler for the given strategy.
    pub fn new(strategy: MissingStrategy) -> Self {
        Self { strategy }
    }

    /// The configured strategy.
    pub fn strategy(&self) -> MissingStrategy {
        self.strategy
    }

    fn drop_rows(df: &DataFrame, actions: &mut Vec<CleaningAction>) -> Result<DataFrame> {
        let (filtered, removed) = drop_incomplete_rows(df)?;

        let description = if removed > 0 {
            format!("Dropped {} rows containing missing values", removed)
        } else {
            "No rows with missing values found".to_string()
        };
        debug!("{}", description);
        actions.push(CleaningAction::new(
            CleaningStage::MissingValues,
            "dataset",
            description,
        ));

        Ok(filtered)
    }

    fn fill_numeric(
        df: &DataFrame,
        statistic: Statistic,
        actions: &mut Vec<CleaningAction>,
    ) -> Result<DataFrame> {
        let mut out = df.clone();

        for name in numeric_column_names(df) {
            let column = df.column(name.as_str())?;
            let missing = column.null_count();
            if missing == 0 {
                continue;
            }

            let series = column.as_materialized_series();
            let value = match statistic {
                Statistic::Mean => StatisticalImputer::numeric_mean(series)?,
                Statistic::Median => StatisticalImputer::numeric_median(series)?,
            };

            match value {
                Some(fill_value) => {
                    let filled = StatisticalImputer::fill_numeric(series, fill_value)?;
                    out.replace(name.as_str(), filled)?;
                    debug!(
                        "Filled '{}' with {}: {:.4} ({} values)",
                        name,
                        statistic.name(),
                        fill_value,
                        missing
                    );
                    actions.push(CleaningAction::new(
                        CleaningStage::MissingValues,
                        name.as_str(),
                        format!(
                            "Filled {} missing values with {}: {:.2}",
                            missing,
                            statistic.name(),
                            fill_value
                        ),
                    ));
                }
                None => {
                    warn!(
                        "Column '{}' has no values to compute a {} from; left as missing",
                        name,
                        statistic.name()
                    );
                    actions.push(CleaningAction::fallback(
                        CleaningStage::MissingValues,
                        name.as_str(),
                        format!("No values to compute a {}; column left all-missing", statistic.name()),
                    ));
                }
            }
        }

        Ok(out)
    }

    fn fill_mode(df: &DataFrame, actions: &mut Vec<CleaningAction>) -> Result<DataFrame> {
        let mut out = df.clone();

        for column in df.get_columns() {
            let missing = column.null_count();
            if missing == 0 {
                continue;
            }

            let name = column.name().clone();
            match StatisticalImputer::fill_mode(column.as_materialized_series())? {
                Some((filled, mode)) => {
                    out.replace(name.as_str(), filled)?;
                    debug!("Filled '{}' with mode: '{}' ({} values)", name, mode, missing);
                    actions.push(CleaningAction::new(
                        CleaningStage::MissingValues,
                        name.as_str(),
                        format!("Filled {} missing values with mode: '{}'", missing, mode),
                    ));
                }
                None => {
                    warn!("Column '{}' has no values to compute a mode from; left as missing", name);
                    actions.push(CleaningAction::fallback(
                        CleaningStage::MissingValues,
                        name.as_str(),
                        "No values to compute a mode; column left all-missing",
                    ));
                }
            }
        }

        Ok(out)
    }
}

impl Stage for MissingValueHandler {
    fn kind(&self) -> CleaningStage {
        CleaningStage::MissingValues
    }

    fn transform(&self, df: &DataFrame, actions: &mut Vec<CleaningAction>) -> Result<DataFrame> {
        match self.strategy {
            MissingStrategy::None => Ok(df.clone()),
            MissingStrategy::DropRows => Self::drop_rows(df, actions),
            MissingStrategy::Mean => Self::fill_numeric(df, Statistic::Mean, actions),
            MissingStrategy::Median => Self::fill_numeric(df, Statistic::Median, actions),
            MissingStrategy::Mode => Self::fill_mode(df, actions),
        }
    }
}
