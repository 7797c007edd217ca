//! The common interface of every cleaning stage.

use crate::error::Result;
use crate::pipeline::CleaningStage;
use crate::types::CleaningAction;
use polars::prelude::DataFrame;

/// A single side-effect-free table transform.
///
/// A stage borrows its input and returns a new table; the input is never
/// modified. Stages keep no state between calls, so one instance can be
/// applied to any number of tables.
pub trait Stage: Send + Sync {
    /// Which pipeline stage this transform implements.
    fn kind(&self) -> CleaningStage;

    /// Transform `df`, recording what was done in `actions`.
    fn transform(&self, df: &DataFrame, actions: &mut Vec<CleaningAction>) -> Result<DataFrame>;

    /// Transform `df`, discarding the action log.
    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut actions = Vec::new();
        self.transform(df, &mut actions)
    }
}
