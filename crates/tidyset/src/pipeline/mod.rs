//! Pipeline module.
//!
//! This module provides the cleaning orchestrator, the [`Stage`] interface
//! and the numeric stages (outlier clipping and normalization).

mod builder;
pub mod normalize;
pub mod outliers;
pub mod progress;
mod stage;

pub use builder::{Pipeline, PipelineBuilder, run};
pub use normalize::{Normalizer, ScalingParams};
pub use outliers::{IqrBounds, OutlierClipper};
pub use progress::{ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate};
pub use stage::Stage;
