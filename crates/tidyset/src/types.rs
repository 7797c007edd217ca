//! Result types of a cleaning run.

use crate::pipeline::CleaningStage;
use crate::profiler::TableSummary;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Result of one pipeline run.
///
/// Holds the cleaned table together with summaries of the table before and
/// after cleaning. The caller owns it; nothing is retained by the pipeline.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    /// The cleaned table.
    pub data: DataFrame,
    /// Descriptive summary of the input table.
    pub before: TableSummary,
    /// Descriptive summary of the cleaned table.
    pub after: TableSummary,
    /// What the run did.
    pub summary: CleaningSummary,
}

// ============================================================================
// Run Summary Types
// ============================================================================

/// Summary of a cleaning run for display or reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Total execution time in milliseconds
    pub duration_ms: u64,
    /// Number of rows before cleaning
    pub rows_before: usize,
    /// Number of rows after cleaning
    pub rows_after: usize,
    /// Number of columns before cleaning
    pub columns_before: usize,
    /// Number of columns after cleaning
    pub columns_after: usize,
    /// Stages that actually ran, in order
    pub stages_run: Vec<CleaningStage>,
    /// Individual actions performed
    pub actions: Vec<CleaningAction>,
    /// Degenerate cases that were handled with a fallback
    pub warnings: Vec<String>,
}

impl CleaningSummary {
    /// Creates a new empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an action to the summary.
    pub fn add_action(&mut self, action: CleaningAction) {
        self.actions.push(action);
    }

    /// Adds a warning to the summary.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Number of rows removed by the run.
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }

    /// Percentage of rows removed by the run.
    pub fn rows_removed_percentage(&self) -> f32 {
        if self.rows_before == 0 {
            0.0
        } else {
            (self.rows_removed() as f32 / self.rows_before as f32) * 100.0
        }
    }
}

/// A single action taken by a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningAction {
    /// Stage that performed the action
    pub stage: CleaningStage,
    /// Column name, or "dataset" for table-wide actions
    pub target: String,
    /// Human-readable description
    pub description: String,
    /// Whether the action left data untouched because of a degenerate input
    #[serde(default)]
    pub fallback: bool,
}

impl CleaningAction {
    /// Creates a new action.
    pub fn new(
        stage: CleaningStage,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            target: target.into(),
            description: description.into(),
            fallback: false,
        }
    }

    /// Creates an action describing a deterministic fallback.
    pub fn fallback(
        stage: CleaningStage,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            fallback: true,
            ..Self::new(stage, target, description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_removed_percentage() {
        let summary = CleaningSummary {
            rows_before: 8,
            rows_after: 6,
            ..CleaningSummary::new()
        };
        assert_eq!(summary.rows_removed(), 2);
        assert!((summary.rows_removed_percentage() - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_rows_removed_percentage_empty() {
        assert_eq!(CleaningSummary::new().rows_removed_percentage(), 0.0);
    }

    #[test]
    fn test_fallback_action_flag() {
        let action = CleaningAction::fallback(CleaningStage::Normalization, "x", "zero variance");
        assert!(action.fallback);
        assert!(!CleaningAction::new(CleaningStage::Normalization, "x", "ok").fallback);
    }
}
