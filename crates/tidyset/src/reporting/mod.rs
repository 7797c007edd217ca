//! Report generation module.
//!
//! Writes cleaned tables to disk and builds the JSON report of a run.
//!
//! # Example
//!
//! ```rust,ignore
//! use tidyset::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::new(PathBuf::from("output"), None);
//! let csv_path = generator.save_dataset(&outcome.data, "data/train.csv")?;
//!
//! let report = ReportGenerator::build_report(
//!     "data/train.csv",
//!     csv_path.to_str(),
//!     &config,
//!     &outcome,
//! );
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! generator.write_report(&report, "clean_train")?;
//! ```

mod generator;

pub use generator::{CleaningReport, OUTPUT_PREFIX, ReportGenerator};
