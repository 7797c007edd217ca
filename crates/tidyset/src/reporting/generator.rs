use crate::config::CleaningConfig;
use crate::error::Result;
use crate::io::write_csv;
use crate::profiler::TableSummary;
use crate::types::{CleaningOutcome, CleaningSummary};
use chrono::Local;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of the default output file name.
pub const OUTPUT_PREFIX: &str = "clean_";

// ============================================================================
// Report Types
// ============================================================================

/// Report of one cleaning run.
///
/// Used for both JSON output to stdout (`--json`) and the report file
/// (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the output file (if written)
    pub output_file: Option<String>,
    /// Configuration the run used
    pub config: CleaningConfig,
    /// What the run did
    pub summary: CleaningSummary,
    /// Summary of the input table
    pub before: TableSummary,
    /// Summary of the cleaned table
    pub after: TableSummary,
}

/// Writes cleaned tables and reports to an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: Option<String>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
            output_name: None,
        }
    }
}

impl ReportGenerator {
    /// Create a new ReportGenerator with custom output settings.
    pub fn new(output_dir: PathBuf, output_name: Option<String>) -> Self {
        Self {
            output_dir,
            output_name,
        }
    }

    /// Directory outputs are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Base name (without extension) of the files written for `input_file`.
    ///
    /// The custom output name wins; otherwise the input's stem prefixed with
    /// [`OUTPUT_PREFIX`].
    pub fn base_name(&self, input_file: &str) -> String {
        if let Some(name) = &self.output_name {
            return name.clone();
        }
        let stem = Path::new(input_file)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "dataset".to_string());
        format!("{}{}", OUTPUT_PREFIX, stem)
    }

    /// Path the cleaned CSV for `input_file` is written to.
    pub fn dataset_path(&self, input_file: &str) -> PathBuf {
        self.output_dir.join(format!("{}.csv", self.base_name(input_file)))
    }

    /// Build a report from a finished run.
    pub fn build_report(
        input_file: &str,
        output_file: Option<&str>,
        config: &CleaningConfig,
        outcome: &CleaningOutcome,
    ) -> CleaningReport {
        CleaningReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(String::from),
            config: *config,
            summary: outcome.summary.clone(),
            before: outcome.before.clone(),
            after: outcome.after.clone(),
        }
    }

    /// Save the cleaned table as CSV. Returns the written path.
    pub fn save_dataset(&self, df: &DataFrame, input_file: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let output_path = self.dataset_path(input_file);
        write_csv(df, &output_path)?;

        info!("Dataset saved: {}", output_path.display());
        Ok(output_path)
    }

    /// Write a report to a JSON file.
    ///
    /// If `report_base_name` is "clean_train", the file will be
    /// "clean_train_report.json".
    pub fn write_report(&self, report: &CleaningReport, report_base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        fs::write(&report_path, serde_json::to_string_pretty(report)?)?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use polars::prelude::*;

    fn outcome() -> CleaningOutcome {
        let df = df!["a" => [1, 1, 2], "b" => ["x", "x", "y"]].unwrap();
        Pipeline::new(CleaningConfig::default()).process(&df).unwrap()
    }

    #[test]
    fn test_base_name() {
        let generator = ReportGenerator::new(PathBuf::from("out"), None);
        assert_eq!(generator.base_name("data/train.csv"), "clean_train");
        assert_eq!(
            generator.dataset_path("train.json"),
            PathBuf::from("out/clean_train.csv")
        );

        let named = ReportGenerator::new(PathBuf::from("out"), Some("final".to_string()));
        assert_eq!(named.base_name("data/train.csv"), "final");
    }

    #[test]
    fn test_build_report() {
        let outcome = outcome();
        let report = ReportGenerator::build_report(
            "train.csv",
            Some("out/clean_train.csv"),
            &CleaningConfig::default(),
            &outcome,
        );

        assert_eq!(report.before.rows, 3);
        assert_eq!(report.after.rows, 2);
        assert_eq!(report.output_file.as_deref(), Some("out/clean_train.csv"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["config"]["remove_duplicates"], true);
        assert_eq!(json["summary"]["stages_run"][0], "deduplication");
    }

    #[test]
    fn test_save_dataset_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(dir.path().join("nested"), None);
        let outcome = outcome();

        let csv_path = generator.save_dataset(&outcome.data, "train.csv").unwrap();
        assert!(csv_path.ends_with("clean_train.csv"));
        assert_eq!(fs::read_to_string(&csv_path).unwrap(), "a,b\n1,x\n2,y\n");

        let report = ReportGenerator::build_report(
            "train.csv",
            csv_path.to_str(),
            &CleaningConfig::default(),
            &outcome,
        );
        let report_path = generator.write_report(&report, "clean_train").unwrap();
        let parsed: CleaningReport =
            serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
        assert_eq!(parsed.summary.rows_after, 2);
    }
}
