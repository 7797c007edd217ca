//! Row-level cleaning: duplicate removal and dropping incomplete rows.
//!
//! Both operations only ever remove whole rows; the surviving rows keep their
//! relative order and every column is kept.

use crate::error::Result;
use crate::pipeline::{CleaningStage, Stage};
use crate::types::CleaningAction;
use polars::prelude::*;
use tracing::debug;

/// Removes rows that repeat an earlier row across all columns.
///
/// Nulls compare equal to nulls, so two all-missing rows are duplicates of each
/// other. The first occurrence is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateRemover;

impl DuplicateRemover {
    /// Create a new duplicate remover.
    pub fn new() -> Self {
        Self
    }

    /// Number of rows that repeat an earlier row.
    pub fn count_duplicates(df: &DataFrame) -> PolarsResult<usize> {
        if df.width() == 0 || df.height() < 2 {
            return Ok(0);
        }
        let unique = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        Ok(df.height() - unique.height())
    }
}

impl Stage for DuplicateRemover {
    fn kind(&self) -> CleaningStage {
        CleaningStage::Deduplication
    }

    fn transform(&self, df: &DataFrame, actions: &mut Vec<CleaningAction>) -> Result<DataFrame> {
        // Zero columns means every row is the same empty tuple; there is nothing
        // meaningful to compare, so the table passes through.
        if df.width() == 0 || df.height() < 2 {
            return Ok(df.clone());
        }

        let before = df.height();
        let unique = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        let removed = before - unique.height();

        if removed > 0 {
            let pct = (removed as f64 / before as f64) * 100.0;
            actions.push(CleaningAction::new(
                CleaningStage::Deduplication,
                "dataset",
                format!("Removed {} duplicate rows ({:.1}%)", removed, pct),
            ));
            debug!("Removed {} duplicate rows", removed);
        } else {
            actions.push(CleaningAction::new(
                CleaningStage::Deduplication,
                "dataset",
                "No duplicate rows found",
            ));
            debug!("No duplicate rows found");
        }

        Ok(unique)
    }
}

/// Drop every row that holds a null in any column.
///
/// Returns the filtered table and the number of rows removed.
pub fn drop_incomplete_rows(df: &DataFrame) -> PolarsResult<(DataFrame, usize)> {
    let mut keep = vec![true; df.height()];

    for col in df.get_columns() {
        if col.null_count() == 0 {
            continue;
        }
        let nulls = col.is_null();
        for (i, is_null) in nulls.into_iter().enumerate() {
            if is_null.unwrap_or(false) {
                keep[i] = false;
            }
        }
    }

    let mask = BooleanChunked::from_slice("mask".into(), &keep);
    let filtered = df.filter(&mask)?;
    let removed = df.height() - filtered.height();
    Ok((filtered, removed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_later_duplicates() {
        let df = df![
            "id" => [1, 2, 1],
            "label" => ["a", "b", "a"],
        ]
        .unwrap();

        let out = DuplicateRemover::new().apply(&df).unwrap();

        assert_eq!(out.height(), 2);
        let ids: Vec<Option<i32>> = out.column("id").unwrap().i32().unwrap().into_iter().collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
        // Input untouched
        assert_eq!(df.height(), 3);
    }

    #[test]
    fn test_keeps_order_of_first_occurrences() {
        let df = df![
            "v" => [5, 3, 5, 9, 3, 1],
        ]
        .unwrap();

        let out = DuplicateRemover::new().apply(&df).unwrap();
        let values: Vec<Option<i32>> = out.column("v").unwrap().i32().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(5), Some(3), Some(9), Some(1)]);
    }

    #[test]
    fn test_null_rows_are_duplicates() {
        let df = df![
            "a" => [None, Some(1.0), None],
            "b" => [Option::<&str>::None, Some("x"), None],
        ]
        .unwrap();

        let out = DuplicateRemover::new().apply(&df).unwrap();
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn test_partial_match_is_not_duplicate() {
        let df = df![
            "a" => [1, 1],
            "b" => ["x", "y"],
        ]
        .unwrap();

        let out = DuplicateRemover::new().apply(&df).unwrap();
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn test_idempotent() {
        let df = df![
            "a" => [1, 2, 2, 3, 1],
            "b" => ["x", "y", "y", "z", "x"],
        ]
        .unwrap();

        let remover = DuplicateRemover::new();
        let once = remover.apply(&df).unwrap();
        let twice = remover.apply(&once).unwrap();
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn test_empty_table_passes_through() {
        let df = DataFrame::empty();
        let out = DuplicateRemover::new().apply(&df).unwrap();
        assert_eq!(out.shape(), (0, 0));
    }

    #[test]
    fn test_count_duplicates() {
        let df = df!["a" => [1, 1, 1, 2]].unwrap();
        assert_eq!(DuplicateRemover::count_duplicates(&df).unwrap(), 2);
    }

    #[test]
    fn test_records_action() {
        let df = df!["a" => [1, 1]].unwrap();
        let mut actions = Vec::new();
        DuplicateRemover::new().transform(&df, &mut actions).unwrap();
        assert_eq!(actions.len(), 1);
        assert!(actions[0].description.contains("Removed 1 duplicate"));
    }

    #[test]
    fn test_drop_incomplete_rows() {
        let df = df![
            "a" => [Some(1), None, Some(3), Some(4)],
            "b" => [Some("x"), Some("y"), None, Some("z")],
        ]
        .unwrap();

        let (out, removed) = drop_incomplete_rows(&df).unwrap();
        assert_eq!(removed, 2);
        let a: Vec<Option<i32>> = out.column("a").unwrap().i32().unwrap().into_iter().collect();
        assert_eq!(a, vec![Some(1), Some(4)]);
    }

    #[test]
    fn test_drop_incomplete_rows_can_empty_table() {
        let df = df![
            "a" => [Some(1), None],
            "b" => [None, Some("y")],
        ]
        .unwrap();

        let (out, removed) = drop_incomplete_rows(&df).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(out.height(), 0);
        assert_eq!(out.width(), 2);
    }
}
