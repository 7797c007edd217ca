//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the cleaning stages.

use crate::cleaner::DuplicateRemover;
use crate::config::{CleaningConfig, MissingStrategy, NormalizeMethod};
use crate::error::{CleaningError, Result};
use crate::imputers::MissingValueHandler;
use crate::pipeline::progress::{
    ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate,
};
use crate::pipeline::{Normalizer, OutlierClipper, Stage};
use crate::profiler::{DataProfiler, TableSummary};
use crate::types::{CleaningOutcome, CleaningSummary};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The cleaning pipeline.
///
/// Runs the enabled stages in a fixed order: missing values, duplicate
/// removal, outlier clipping, normalization. The pipeline keeps no state
/// between runs and never modifies its input.
///
/// # Example
///
/// ```rust,ignore
/// use tidyset::{CleaningConfig, MissingStrategy, Pipeline};
///
/// let outcome = Pipeline::builder()
///     .config(
///         CleaningConfig::builder()
///             .missing_strategy(MissingStrategy::Median)
///             .clip_outliers(true)
///             .build(),
///     )
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()
///     .process(&dataframe)?;
/// ```
pub struct Pipeline {
    config: CleaningConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// One pipeline can be shared between threads and run concurrently
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Create a pipeline for `config` without a progress reporter.
    pub fn new(config: CleaningConfig) -> Self {
        Self {
            config,
            progress_reporter: None,
        }
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// The enabled stages, in execution order.
    pub fn stages(&self) -> Vec<Box<dyn Stage>> {
        let mut stages: Vec<Box<dyn Stage>> = Vec::with_capacity(4);

        if self.config.missing_strategy != MissingStrategy::None {
            stages.push(Box::new(MissingValueHandler::new(self.config.missing_strategy)));
        }
        if self.config.remove_duplicates {
            stages.push(Box::new(DuplicateRemover::new()));
        }
        if self.config.clip_outliers {
            stages.push(Box::new(OutlierClipper::new()));
        }
        if self.config.normalize_method != NormalizeMethod::None {
            stages.push(Box::new(Normalizer::new(self.config.normalize_method)));
        }

        stages
    }

    /// Clean a table.
    ///
    /// Returns the cleaned table, summaries of the input and the output, and a
    /// record of what each stage did.
    ///
    /// # Errors
    ///
    /// Returns `CleaningError::StageFailed` naming the stage when a stage
    /// cannot build its output.
    pub fn process(&self, df: &DataFrame) -> Result<CleaningOutcome> {
        match self.process_internal(df) {
            Ok(outcome) => {
                self.report_progress(ProgressUpdate::complete("Cleaning completed successfully"));
                Ok(outcome)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn process_internal(&self, df: &DataFrame) -> Result<CleaningOutcome> {
        let start_time = Instant::now();

        info!(
            "Starting cleaning pipeline on {} rows x {} columns...",
            df.height(),
            df.width()
        );
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Initializing,
            0.0,
            "Summarizing input...",
        ));

        let before = DataProfiler::summarize(df)?;

        let mut summary = CleaningSummary::new();
        summary.rows_before = df.height();
        summary.columns_before = df.width();

        self.report_progress(ProgressUpdate::new(
            CleaningStage::Initializing,
            1.0,
            "Input summarized",
        ));

        let stages = self.stages();
        if stages.is_empty() {
            info!("No stages enabled; returning the input unchanged");
        }

        let mut current = df.clone();
        for (index, stage) in stages.iter().enumerate() {
            let kind = stage.kind();
            info!("Step {}: {}...", index + 1, kind.display_name());
            self.report_progress(ProgressUpdate::new(
                kind,
                0.0,
                format!("{}...", kind.display_name()),
            ));

            let mut actions = Vec::new();
            current = stage
                .transform(&current, &mut actions)
                .map_err(|e| CleaningError::StageFailed {
                    stage: kind.as_str().to_string(),
                    reason: e.to_string(),
                })?;

            debug!(
                "{} finished with {} actions; table is now {} x {}",
                kind.display_name(),
                actions.len(),
                current.height(),
                current.width()
            );

            for action in actions {
                if action.fallback {
                    summary.add_warning(format!("{}: {}", action.target, action.description));
                }
                summary.add_action(action);
            }
            summary.stages_run.push(kind);

            self.report_progress(ProgressUpdate::new(
                kind,
                1.0,
                format!("{} complete", kind.display_name()),
            ));
        }

        let after = DataProfiler::summarize(&current)?;

        summary.rows_after = current.height();
        summary.columns_after = current.width();
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Cleaning complete in {} ms: {} -> {} rows, {} actions",
            summary.duration_ms,
            summary.rows_before,
            summary.rows_after,
            summary.actions.len()
        );

        Ok(CleaningOutcome {
            data: current,
            before,
            after,
            summary,
        })
    }
}

/// Run the pipeline once with `config`.
///
/// Returns the summary of the input table and the cleaned table.
pub fn run(df: &DataFrame, config: &CleaningConfig) -> Result<(TableSummary, DataFrame)> {
    let outcome = Pipeline::new(*config).process(df)?;
    Ok((outcome.before, outcome.data))
}

/// Builder for creating a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CleaningConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the cleaning configuration.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience wrapper around [`Self::progress_reporter`].
    pub fn on_progress<F>(self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter(Arc::new(ClosureProgressReporter::new(callback)))
    }

    /// Build the pipeline. A missing configuration falls back to
    /// [`CleaningConfig::default`].
    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config.unwrap_or_default(),
            progress_reporter: self.progress_reporter,
        }
    }
}
