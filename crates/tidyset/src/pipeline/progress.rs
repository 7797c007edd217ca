//! Progress reporting for the cleaning pipeline.
//!
//! The pipeline reports one update when a stage starts, one when it finishes,
//! and a terminal update on completion or failure. Consumers plug in through
//! the [`ProgressReporter`] trait or a plain closure.
//!
//! # Example
//!
//! ```rust,ignore
//! use tidyset::Pipeline;
//!
//! let outcome = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()
//!     .process(&df)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the cleaning pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    /// Summarizing the input table
    Initializing,
    /// Imputing or dropping missing values
    MissingValues,
    /// Removing duplicate rows
    Deduplication,
    /// Clipping outliers to IQR bounds
    OutlierClipping,
    /// Rescaling numeric columns
    Normalization,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl CleaningStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::MissingValues => "Handling Missing Values",
            Self::Deduplication => "Removing Duplicates",
            Self::OutlierClipping => "Clipping Outliers",
            Self::Normalization => "Normalizing",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Stable snake_case identifier, used in error messages and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::MissingValues => "missing_values",
            Self::Deduplication => "deduplication",
            Self::OutlierClipping => "outlier_clipping",
            Self::Normalization => "normalization",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }

    /// Share of the overall run attributed to this stage.
    ///
    /// Weights of the working stages sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Initializing => 0.10,
            Self::MissingValues => 0.30,
            Self::Deduplication => 0.15,
            Self::OutlierClipping => 0.20,
            Self::Normalization => 0.25,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Initializing => 0.0,
            Self::MissingValues => 0.10,
            Self::Deduplication => 0.40,
            Self::OutlierClipping => 0.55,
            Self::Normalization => 0.75,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A single progress update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: CleaningStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    /// Creates a new progress update for a stage.
    pub fn new(stage: CleaningStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: CleaningStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: CleaningStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Trait for receiving progress updates during cleaning.
///
/// Implementations must be `Send + Sync` so the pipeline itself stays
/// shareable across threads.
pub trait ProgressReporter: Send + Sync {
    /// Called when a stage starts or finishes.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}
