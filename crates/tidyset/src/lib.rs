//! Tabular Data Cleaning Library
//!
//! A small, deterministic cleaning pipeline for tabular data built on Polars.
//!
//! # Overview
//!
//! This library provides four independent cleaning stages and an
//! orchestrator that runs them in a fixed order:
//!
//! - **Missing values**: drop incomplete rows, or fill with mean, median or mode
//! - **Duplicates**: drop rows that repeat an earlier row
//! - **Outliers**: clip numeric columns to their IQR bounds
//! - **Normalization**: min-max or z-score rescaling of numeric columns
//!
//! Around the pipeline sit a loader for common file formats, describe-style
//! table summaries, and a report writer.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tidyset::{CleaningConfig, MissingStrategy, NormalizeMethod, Pipeline};
//!
//! let df = tidyset::io::load_path("data.csv")?;
//!
//! let config = CleaningConfig::builder()
//!     .missing_strategy(MissingStrategy::Mean)
//!     .clip_outliers(true)
//!     .normalize_method(NormalizeMethod::MinMax)
//!     .build();
//!
//! let outcome = Pipeline::builder().config(config).build().process(&df)?;
//!
//! println!("{} -> {} rows", outcome.before.rows, outcome.after.rows);
//! tidyset::io::write_csv(&outcome.data, "clean_data.csv")?;
//! ```
//!
//! # Stages
//!
//! Every stage implements [`Stage`] and can be used on its own:
//!
//! ```rust,ignore
//! use tidyset::{OutlierClipper, Stage};
//!
//! let clipped = OutlierClipper::new().apply(&df)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::DuplicateRemover;
pub use config::{CleaningConfig, CleaningConfigBuilder, MissingStrategy, NormalizeMethod};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use imputers::{MissingValueHandler, StatisticalImputer};
pub use pipeline::{
    CleaningStage, ClosureProgressReporter, IqrBounds, Normalizer, OutlierClipper, Pipeline,
    PipelineBuilder, ProgressReporter, ProgressUpdate, ScalingParams, Stage, run,
};
pub use profiler::{ColumnStats, DataProfiler, TableSummary};
pub use reporting::{CleaningReport, ReportGenerator};
pub use types::{CleaningAction, CleaningOutcome, CleaningSummary};
pub use utils::{ColumnKind, is_numeric_dtype};
