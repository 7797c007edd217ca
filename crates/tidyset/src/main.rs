//! CLI entry point for the cleaning pipeline.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use tidyset::{
    CleaningConfig, CleaningOutcome, CleaningReport, DataProfiler, MissingStrategy,
    NormalizeMethod, Pipeline, ReportGenerator, TableSummary,
};
use tracing::{error, info};

/// CLI-compatible missing value strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMissingStrategy {
    /// Leave missing values as they are
    None,
    /// Drop rows containing any missing value
    DropRows,
    /// Fill numeric columns with their mean
    Mean,
    /// Fill numeric columns with their median
    Median,
    /// Fill every column with its most frequent value
    Mode,
}

impl From<CliMissingStrategy> for MissingStrategy {
    fn from(cli: CliMissingStrategy) -> Self {
        match cli {
            CliMissingStrategy::None => MissingStrategy::None,
            CliMissingStrategy::DropRows => MissingStrategy::DropRows,
            CliMissingStrategy::Mean => MissingStrategy::Mean,
            CliMissingStrategy::Median => MissingStrategy::Median,
            CliMissingStrategy::Mode => MissingStrategy::Mode,
        }
    }
}

/// CLI-compatible normalization method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliNormalizeMethod {
    /// Keep values on their original scale
    None,
    /// Rescale to [0, 1]
    MinMax,
    /// Rescale to zero mean and unit variance
    ZScore,
}

impl From<CliNormalizeMethod> for NormalizeMethod {
    fn from(cli: CliNormalizeMethod) -> Self {
        match cli {
            CliNormalizeMethod::None => NormalizeMethod::None,
            CliNormalizeMethod::MinMax => NormalizeMethod::MinMax,
            CliNormalizeMethod::ZScore => NormalizeMethod::ZScore,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Tabular data cleaning pipeline",
    long_about = "Cleans a tabular dataset: missing values, duplicate rows, outliers and scaling.\n\n\
                  SUPPORTED INPUTS:\n  \
                  .csv .tsv .json .ndjson .jsonl .parquet .xlsx .xlsm .xls .ods .xml\n\n\
                  EXAMPLES:\n  \
                  # Drop duplicates only (the default)\n  \
                  tidyset -i data.csv\n\n  \
                  # Fill gaps with the median, clip outliers, min-max scale\n  \
                  tidyset -i data.csv --missing median --clip-outliers --normalize min-max\n\n  \
                  # Preview the input and the planned stages\n  \
                  tidyset -i data.csv --dry-run"
)]
struct Args {
    /// Path to the file to clean
    #[arg(short, long)]
    input: String,

    /// Output directory for results
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Custom output file name (without extension)
    ///
    /// If not specified, uses "clean_{input_name}"
    #[arg(long)]
    output_name: Option<String>,

    /// How to handle missing values
    #[arg(long, value_enum, default_value = "none")]
    missing: CliMissingStrategy,

    /// Keep duplicate rows instead of removing them
    #[arg(long)]
    keep_duplicates: bool,

    /// Clip numeric columns to their IQR bounds
    #[arg(long)]
    clip_outliers: bool,

    /// How to rescale numeric columns
    #[arg(long, value_enum, default_value = "none")]
    normalize: CliNormalizeMethod,

    /// Preview the input summary and planned stages without cleaning
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <output_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

impl Args {
    fn cleaning_config(&self) -> CleaningConfig {
        CleaningConfig::builder()
            .missing_strategy(self.missing.into())
            .remove_duplicates(!self.keep_duplicates)
            .clip_outliers(self.clip_outliers)
            .normalize_method(self.normalize.into())
            .build()
    }
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !std::path::Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    info!("Loading dataset from: {}", args.input);
    let data = load_input(&args.input)?;

    let config = args.cleaning_config();

    if args.dry_run {
        return run_dry_run(&args, &config, &data);
    }

    let mut builder = Pipeline::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }
    let pipeline = builder.build();

    let outcome = match pipeline.process(&data) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Pipeline failed: {}", e);
            return Err(anyhow!("Pipeline failed: {}", e));
        }
    };

    handle_pipeline_output(&args, &config, &outcome)
}

/// Load the input table.
///
/// Errors the user can fix by changing the file get a hint listing the
/// supported formats.
fn load_input(path: &str) -> Result<DataFrame> {
    tidyset::io::load_path(path).map_err(|e| {
        let context = if e.is_recoverable() {
            format!(
                "Could not load {} (supported formats: {})",
                path,
                tidyset::io::SUPPORTED_FORMATS.join(", ")
            )
        } else {
            format!("Could not load {}", path)
        };
        anyhow::Error::new(e).context(context)
    })
}

/// Handle pipeline output based on CLI flags.
///
/// Output behavior:
/// - Default: Print human-readable summary to stdout
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--emit-report`: Write JSON report to file
fn handle_pipeline_output(
    args: &Args,
    config: &CleaningConfig,
    outcome: &CleaningOutcome,
) -> Result<()> {
    let generator = ReportGenerator::new(PathBuf::from(&args.output), args.output_name.clone());

    let output_path = generator.save_dataset(&outcome.data, &args.input)?;
    let output_file = output_path.to_string_lossy().to_string();

    let report = ReportGenerator::build_report(&args.input, Some(&output_file), config, outcome);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let report_path = generator.write_report(&report, &generator.base_name(&args.input))?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report);

    Ok(())
}

/// Run dry-run mode - show the input and the planned stages without cleaning.
///
/// Uses `println!` rather than logging: this output is the point of the flag.
fn run_dry_run(args: &Args, config: &CleaningConfig, data: &DataFrame) -> Result<()> {
    let summary = DataProfiler::summarize(data)?;

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of cleaning stages");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", args.input);
    print_table_overview(&summary);
    println!();

    println!("COLUMN SUMMARIES");
    println!("{}", "-".repeat(40));
    print_column_table(&summary);
    println!();

    println!("PLANNED STAGES");
    println!("{}", "-".repeat(40));
    let stages = Pipeline::new(*config).stages();
    if stages.is_empty() {
        println!("  None: the output would equal the input");
    }
    for (index, stage) in stages.iter().enumerate() {
        println!("  {}. {}", index + 1, stage.kind().display_name());
    }
    println!();

    println!("OUTPUT FILES (will be created)");
    println!("{}", "-".repeat(40));
    let generator = ReportGenerator::new(PathBuf::from(&args.output), args.output_name.clone());
    println!("  - {}", generator.dataset_path(&args.input).display());
    if args.emit_report {
        println!(
            "  - {}",
            generator
                .output_dir()
                .join(format!("{}_report.json", generator.base_name(&args.input)))
                .display()
        );
    }
    println!();

    println!("{}", "=".repeat(80));
    println!("To execute the cleaning, run without --dry-run");
    println!("{}", "=".repeat(80));

    Ok(())
}

fn print_table_overview(summary: &TableSummary) {
    println!("  Rows: {}", summary.rows);
    println!("  Columns: {}", summary.columns);
    println!("  Duplicate rows: {}", summary.duplicate_rows);
    println!(
        "  Missing cells: {} ({:.1}%)",
        summary.missing_cells,
        summary.missing_percentage()
    );
}

fn print_column_table(summary: &TableSummary) {
    println!(
        "{:<20} {:<10} {:<10} {:<8} {:>12} {:>12} {:>12}",
        "Column", "Type", "Missing %", "Unique", "Mean", "Min", "Max"
    );
    println!("{}", "-".repeat(88));

    let fmt = |v: Option<f64>| v.map(|x| format!("{:.3}", x)).unwrap_or_else(|| "-".to_string());
    for col in &summary.column_summaries {
        println!(
            "{:<20} {:<10} {:<10.1} {:<8} {:>12} {:>12} {:>12}",
            truncate_str(&col.name, 19),
            truncate_str(&col.dtype, 9),
            col.null_percentage(),
            col.unique_count,
            fmt(col.mean),
            fmt(col.min),
            fmt(col.max)
        );
    }
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Print a human-readable summary of the cleaning results.
fn print_human_readable_summary(report: &CleaningReport) {
    let summary = &report.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_file, summary.rows_before, summary.columns_before
    );
    if let Some(ref output_file) = report.output_file {
        println!(
            "Output: {} ({} rows x {} columns)",
            output_file, summary.rows_after, summary.columns_after
        );
    }
    println!();

    println!("Processing Summary:");
    println!("  Duration: {}ms", summary.duration_ms);
    println!(
        "  Rows: {} -> {} ({} removed, {:.1}%)",
        summary.rows_before,
        summary.rows_after,
        summary.rows_removed(),
        summary.rows_removed_percentage()
    );
    println!(
        "  Missing cells: {} -> {}",
        report.before.missing_cells, report.after.missing_cells
    );
    println!(
        "  Duplicate rows: {} -> {}",
        report.before.duplicate_rows, report.after.duplicate_rows
    );
    println!();

    if !summary.actions.is_empty() {
        println!("Actions Taken:");
        for action in summary.actions.iter().take(10) {
            println!(
                "  - [{}] {}: {}",
                action.stage.display_name(),
                action.target,
                action.description
            );
        }
        if summary.actions.len() > 10 {
            println!("  ... and {} more actions", summary.actions.len() - 10);
        }
        println!();
    }

    if !summary.warnings.is_empty() {
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    println!("After cleaning:");
    print_column_table(&report.after);
    println!();

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(80));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_to_config() {
        let args = Args::parse_from([
            "tidyset",
            "-i",
            "data.csv",
            "--missing",
            "drop-rows",
            "--keep-duplicates",
            "--normalize",
            "z-score",
        ]);
        let config = args.cleaning_config();

        assert_eq!(config.missing_strategy, MissingStrategy::DropRows);
        assert!(!config.remove_duplicates);
        assert!(!config.clip_outliers);
        assert_eq!(config.normalize_method, NormalizeMethod::ZScore);
    }

    #[test]
    fn test_default_args_match_default_config() {
        let args = Args::parse_from(["tidyset", "-i", "data.csv"]);
        assert_eq!(args.cleaning_config(), CleaningConfig::default());
    }

    #[test]
    fn test_load_input_hints_at_supported_formats() {
        let err = load_input("notes.docx").unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("supported formats: csv"));
        assert!(message.contains("docx"));

        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.csv");
        std::fs::write(&empty, b"").unwrap();
        let err = load_input(empty.to_str().unwrap()).unwrap_err();
        assert!(format!("{:#}", err).contains("supported formats"));
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a_very_long_column_name", 10), "a_very_...");
    }
}
