//! Imputation module for handling missing values.
//!
//! This module provides:
//! - The [`MissingValueHandler`] pipeline stage
//! - Statistical fill helpers (mean, median, mode)

mod missing;
mod statistical;

pub use missing::MissingValueHandler;
pub use statistical::StatisticalImputer;
