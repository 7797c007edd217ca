//! Configuration types for the cleaning pipeline.
//!
//! The whole configuration surface is four selectors: a missing-value
//! strategy, a duplicate-removal flag, an outlier-clipping flag and a
//! normalization method. They can be built fluently, deserialized from a
//! frontend's JSON, or parsed from their string names.

use crate::error::CleaningError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy for handling missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingStrategy {
    /// Leave missing values as they are
    #[default]
    None,
    /// Drop every row that contains at least one missing value
    DropRows,
    /// Fill numeric columns with the mean of their non-missing values
    Mean,
    /// Fill numeric columns with the median of their non-missing values
    Median,
    /// Fill every column with its most frequent non-missing value
    Mode,
}

impl MissingStrategy {
    /// Stable snake_case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::DropRows => "drop_rows",
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
        }
    }
}

impl fmt::Display for MissingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingStrategy {
    type Err = CleaningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "none" => Ok(Self::None),
            "drop_rows" | "drop" => Ok(Self::DropRows),
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "mode" => Ok(Self::Mode),
            other => Err(CleaningError::InvalidConfig(format!(
                "unknown missing-value strategy '{}' (expected none, drop_rows, mean, median or mode)",
                other
            ))),
        }
    }
}

/// Method for rescaling numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMethod {
    /// Leave numeric columns at their original scale
    #[default]
    None,
    /// Rescale to [0, 1] using the column's min and max
    MinMax,
    /// Center on the mean and divide by the population standard deviation
    ZScore,
}

impl NormalizeMethod {
    /// Stable snake_case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::MinMax => "min_max",
            Self::ZScore => "z_score",
        }
    }
}

impl fmt::Display for NormalizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalizeMethod {
    type Err = CleaningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "none" => Ok(Self::None),
            "min_max" | "minmax" => Ok(Self::MinMax),
            "z_score" | "zscore" | "standard" => Ok(Self::ZScore),
            other => Err(CleaningError::InvalidConfig(format!(
                "unknown normalization method '{}' (expected none, min_max or z_score)",
                other
            ))),
        }
    }
}

fn normalize_name(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('-', "_")
}

/// Configuration for the cleaning pipeline.
///
/// Use [`CleaningConfig::builder()`] to create a configuration with a fluent
/// API. The defaults mirror what a user sees before touching any option:
/// missing values left alone, duplicates removed, no clipping and no
/// normalization.
///
/// # Example
///
/// ```rust,ignore
/// use tidyset::config::{CleaningConfig, MissingStrategy, NormalizeMethod};
///
/// let config = CleaningConfig::builder()
///     .missing_strategy(MissingStrategy::Median)
///     .clip_outliers(true)
///     .normalize_method(NormalizeMethod::ZScore)
///     .build();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// How to treat missing values.
    /// Default: None
    pub missing_strategy: MissingStrategy,

    /// Whether to drop rows that repeat an earlier row.
    /// Default: true
    pub remove_duplicates: bool,

    /// Whether to clip numeric columns to their IQR bounds.
    /// Default: false
    pub clip_outliers: bool,

    /// How to rescale numeric columns.
    /// Default: None
    pub normalize_method: NormalizeMethod,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            missing_strategy: MissingStrategy::default(),
            remove_duplicates: true,
            clip_outliers: false,
            normalize_method: NormalizeMethod::default(),
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Returns true when every stage is disabled.
    pub fn is_noop(&self) -> bool {
        self.missing_strategy == MissingStrategy::None
            && !self.remove_duplicates
            && !self.clip_outliers
            && self.normalize_method == NormalizeMethod::None
    }
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    missing_strategy: Option<MissingStrategy>,
    remove_duplicates: Option<bool>,
    clip_outliers: Option<bool>,
    normalize_method: Option<NormalizeMethod>,
}

impl CleaningConfigBuilder {
    /// Set the missing-value strategy.
    pub fn missing_strategy(mut self, strategy: MissingStrategy) -> Self {
        self.missing_strategy = Some(strategy);
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Enable or disable IQR outlier clipping.
    pub fn clip_outliers(mut self, clip: bool) -> Self {
        self.clip_outliers = Some(clip);
        self
    }

    /// Set the normalization method.
    pub fn normalize_method(mut self, method: NormalizeMethod) -> Self {
        self.normalize_method = Some(method);
        self
    }

    /// Build the configuration, filling unset selectors with their defaults.
    pub fn build(self) -> CleaningConfig {
        let defaults = CleaningConfig::default();
        CleaningConfig {
            missing_strategy: self.missing_strategy.unwrap_or(defaults.missing_strategy),
            remove_duplicates: self.remove_duplicates.unwrap_or(defaults.remove_duplicates),
            clip_outliers: self.clip_outliers.unwrap_or(defaults.clip_outliers),
            normalize_method: self.normalize_method.unwrap_or(defaults.normalize_method),
        }
    }
}
