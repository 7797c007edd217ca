//! Integration tests for the cleaning pipeline.
//!
//! These tests verify end-to-end behavior of the pipeline using the fixture
//! datasets under `tests/fixtures`.

use pretty_assertions::assert_eq;
use polars::prelude::*;
use std::path::PathBuf;
use tidyset::{
    CleaningConfig, CleaningStage, DuplicateRemover, MissingStrategy, MissingValueHandler,
    NormalizeMethod, Normalizer, OutlierClipper, Pipeline, ReportGenerator, Stage,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(filename: &str) -> DataFrame {
    tidyset::io::load_path(fixtures_path().join(filename)).expect("Failed to load fixture")
}

fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

fn null_mask(df: &DataFrame) -> Vec<Vec<bool>> {
    df.get_columns()
        .iter()
        .map(|c| c.is_null().into_iter().map(|v| v.unwrap_or(false)).collect())
        .collect()
}

fn clean(df: &DataFrame, config: CleaningConfig) -> tidyset::CleaningOutcome {
    Pipeline::builder().config(config).build().process(df).unwrap()
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_customers_fixture() {
    let df = load_fixture("customers.csv");
    assert_eq!(df.shape(), (9, 4));

    let summary = tidyset::DataProfiler::summarize(&df).unwrap();
    assert_eq!(summary.duplicate_rows, 1);
    assert_eq!(summary.missing_cells, 3);
    assert_eq!(summary.column("income").unwrap().max, Some(1_000_000.0));
}

#[test]
fn test_load_ndjson_fixture() {
    let df = load_fixture("scores.ndjson");
    assert_eq!(df.shape(), (3, 2));

    let outcome = clean(&df, CleaningConfig::default());
    assert_eq!(outcome.data.height(), 2);
}

#[test]
fn test_load_xlsx_fixture() {
    let df = load_fixture("stations.xlsx");
    assert_eq!(df.shape(), (4, 3));
    assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);

    let config = CleaningConfig::builder()
        .missing_strategy(MissingStrategy::Mean)
        .build();
    let outcome = clean(&df, config);

    // Rows 2 and 3 are identical; the missing score is filled with (10.5 + 12) / 2
    assert_eq!(outcome.data.height(), 3);
    assert_eq!(
        f64_values(&outcome.data, "score"),
        vec![Some(10.5), Some(11.25), Some(12.0)]
    );
    assert_eq!(outcome.data.column("city").unwrap().null_count(), 1);
}

#[test]
fn test_load_xml_fixture() {
    let df = load_fixture("readings.xml");
    assert_eq!(df.shape(), (5, 3));

    let summary = tidyset::DataProfiler::summarize(&df).unwrap();
    assert_eq!(summary.duplicate_rows, 1);
    assert_eq!(summary.missing_cells, 3);

    let site = df.column("site").unwrap().as_materialized_series().clone();
    assert_eq!(site.str().unwrap().get(3), Some("East & West"));

    let outcome = clean(&df, CleaningConfig::default());
    assert_eq!(outcome.data.height(), 4);
}

#[test]
fn test_unsupported_format_is_rejected_before_reading() {
    let err = tidyset::io::load_path(fixtures_path().join("notes.docx")).unwrap_err();
    assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    assert!(err.to_string().contains("docx"));
    assert!(err.is_recoverable());
}

// ============================================================================
// Full Pipeline Runs
// ============================================================================

#[test]
fn test_default_config_only_removes_duplicates() {
    let df = load_fixture("customers.csv");
    let outcome = clean(&df, CleaningConfig::default());

    assert_eq!(outcome.data.shape(), (8, 4));
    assert_eq!(outcome.before.rows, 9);
    assert_eq!(outcome.after.duplicate_rows, 0);
    assert_eq!(outcome.after.missing_cells, 3);
    assert_eq!(outcome.summary.stages_run, vec![CleaningStage::Deduplication]);
}

#[test]
fn test_drop_rows_then_deduplicate() {
    let df = load_fixture("customers.csv");
    let config = CleaningConfig::builder()
        .missing_strategy(MissingStrategy::DropRows)
        .build();
    let outcome = clean(&df, config);

    assert_eq!(outcome.data.height(), 5);
    assert_eq!(
        f64_values(&outcome.data, "id"),
        vec![Some(1.0), Some(5.0), Some(6.0), Some(7.0), Some(8.0)]
    );
    assert_eq!(outcome.after.missing_cells, 0);
}

#[test]
fn test_mode_fills_text_column() {
    let df = load_fixture("customers.csv");
    let config = CleaningConfig::builder()
        .missing_strategy(MissingStrategy::Mode)
        .remove_duplicates(false)
        .build();
    let outcome = clean(&df, config);

    let city = outcome.data.column("city").unwrap().as_materialized_series().clone();
    assert_eq!(city.str().unwrap().get(3), Some("Lyon"));
    assert_eq!(outcome.after.missing_cells, 0);
}

#[test]
fn test_all_stages() {
    let df = load_fixture("customers.csv");
    let config = CleaningConfig::builder()
        .missing_strategy(MissingStrategy::Mean)
        .clip_outliers(true)
        .normalize_method(NormalizeMethod::MinMax)
        .build();
    let outcome = clean(&df, config);

    assert_eq!(outcome.data.shape(), (8, 4));
    assert_eq!(
        outcome.summary.stages_run,
        vec![
            CleaningStage::MissingValues,
            CleaningStage::Deduplication,
            CleaningStage::OutlierClipping,
            CleaningStage::Normalization,
        ]
    );

    for name in ["id", "age", "income"] {
        let values: Vec<f64> = f64_values(&outcome.data, name).into_iter().flatten().collect();
        assert_eq!(values.len(), 8, "column {} should be fully filled", name);
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    // Mean fill skips text; the missing city survives
    assert_eq!(outcome.data.column("city").unwrap().null_count(), 1);

    // Input untouched
    assert_eq!(df.height(), 9);
    assert_eq!(df.column("income").unwrap().null_count(), 1);
}

#[test]
fn test_constant_column_z_score() {
    let df = load_fixture("constant.csv");
    let config = CleaningConfig::builder()
        .normalize_method(NormalizeMethod::ZScore)
        .build();
    let outcome = clean(&df, config);

    assert_eq!(
        f64_values(&outcome.data, "reading"),
        vec![Some(0.0), Some(0.0), Some(0.0)]
    );
    assert_eq!(outcome.summary.warnings.len(), 1);
}

// ============================================================================
// Stage Properties
// ============================================================================

#[test]
fn test_deduplication_is_idempotent() {
    let df = load_fixture("customers.csv");
    let once = DuplicateRemover::new().apply(&df).unwrap();
    let twice = DuplicateRemover::new().apply(&once).unwrap();
    assert!(once.equals_missing(&twice));
}

#[test]
fn test_numeric_stages_preserve_shape_text_and_missing_cells() {
    let df = load_fixture("customers.csv");
    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(OutlierClipper::new()),
        Box::new(Normalizer::new(NormalizeMethod::MinMax)),
        Box::new(Normalizer::new(NormalizeMethod::ZScore)),
    ];

    for stage in &stages {
        let out = stage.apply(&df).unwrap();
        assert_eq!(out.shape(), df.shape());
        assert_eq!(null_mask(&out), null_mask(&df));

        let before = df.column("city").unwrap().as_materialized_series();
        let after = out.column("city").unwrap().as_materialized_series();
        assert!(after.equals_missing(before));
    }
}

#[test]
fn test_no_stage_changes_column_names() {
    let df = load_fixture("customers.csv");
    let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();

    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(MissingValueHandler::new(MissingStrategy::DropRows)),
        Box::new(MissingValueHandler::new(MissingStrategy::Median)),
        Box::new(MissingValueHandler::new(MissingStrategy::Mode)),
        Box::new(DuplicateRemover::new()),
        Box::new(OutlierClipper::new()),
        Box::new(Normalizer::new(NormalizeMethod::ZScore)),
    ];

    for stage in &stages {
        let out = stage.apply(&df).unwrap();
        let out_names: Vec<String> = out.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(out_names, names);
    }
}

#[test]
fn test_documented_examples() {
    let mean = MissingValueHandler::new(MissingStrategy::Mean)
        .apply(&df!["x" => [Some(1), None, Some(3)]].unwrap())
        .unwrap();
    assert_eq!(f64_values(&mean, "x"), vec![Some(1.0), Some(2.0), Some(3.0)]);

    let mode = MissingValueHandler::new(MissingStrategy::Mode)
        .apply(&df!["x" => [Some(1), Some(1), Some(2), Some(2), None]].unwrap())
        .unwrap();
    assert_eq!(
        f64_values(&mode, "x"),
        vec![Some(1.0), Some(1.0), Some(2.0), Some(2.0), Some(1.0)]
    );

    let clipped = OutlierClipper::new()
        .apply(&df!["x" => [1, 2, 3, 4, 100]].unwrap())
        .unwrap();
    assert_eq!(
        f64_values(&clipped, "x"),
        vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(7.0)]
    );

    let scaled = Normalizer::new(NormalizeMethod::MinMax)
        .apply(&df!["x" => [0, 5, 10]].unwrap())
        .unwrap();
    assert_eq!(f64_values(&scaled, "x"), vec![Some(0.0), Some(0.5), Some(1.0)]);

    let deduped = DuplicateRemover::new()
        .apply(&df!["n" => [1, 2, 1], "s" => ["a", "b", "a"]].unwrap())
        .unwrap();
    assert_eq!(f64_values(&deduped, "n"), vec![Some(1.0), Some(2.0)]);
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_export_and_report_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let df = load_fixture("customers.csv");
    let config = CleaningConfig::builder()
        .missing_strategy(MissingStrategy::Median)
        .build();
    let outcome = clean(&df, config);

    let generator = ReportGenerator::new(dir.path().to_path_buf(), None);
    let csv_path = generator.save_dataset(&outcome.data, "customers.csv").unwrap();
    assert!(csv_path.ends_with("clean_customers.csv"));

    let reloaded = tidyset::io::load_path(&csv_path).unwrap();
    assert_eq!(reloaded.shape(), outcome.data.shape());

    let report = ReportGenerator::build_report("customers.csv", csv_path.to_str(), &config, &outcome);
    let report_path = generator.write_report(&report, "clean_customers").unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(report_path).unwrap()).unwrap();

    assert_eq!(json["config"]["missing_strategy"], "median");
    assert_eq!(json["before"]["rows"], 9);
    assert_eq!(json["after"]["rows"], 8);
}

#[test]
fn test_csv_bytes_have_header_and_no_index() {
    let df = df!["a" => [1, 2], "b" => ["x", "y"]].unwrap();
    let text = String::from_utf8(tidyset::io::to_csv_bytes(&df).unwrap()).unwrap();
    assert_eq!(text, "a,b\n1,x\n2,y\n");
}
