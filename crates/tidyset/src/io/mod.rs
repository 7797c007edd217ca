//! Loading tables from files and exporting them as CSV.
//!
//! The reader is chosen by file extension. Delimited text, JSON and Parquet
//! go through polars; spreadsheets (first sheet only) and flat XML records are
//! read cell by cell and typed with [`typed_column`]. Loading never touches
//! the pipeline; a failed load surfaces as a [`CleaningError`] before any
//! stage runs.

mod spreadsheet;
mod xml;

use crate::error::{CleaningError, Result};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// File extensions the loader understands.
pub const SUPPORTED_FORMATS: [&str; 11] = [
    "csv", "tsv", "json", "ndjson", "jsonl", "parquet", "xlsx", "xlsm", "xls", "ods", "xml",
];

/// Number of rows used for schema inference of delimited text.
const INFER_SCHEMA_ROWS: usize = 100;

/// Input formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Tsv,
    Json,
    NdJson,
    Parquet,
    /// Any workbook calamine can open; only the first sheet is read
    Excel,
    Xml,
}

impl DataFormat {
    /// Detect the format of `file_name` from its extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::NdJson),
            "parquet" => Ok(Self::Parquet),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Self::Excel),
            "xml" => Ok(Self::Xml),
            _ => Err(CleaningError::UnsupportedFormat {
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    extension
                },
                supported: SUPPORTED_FORMATS.join(", "),
            }),
        }
    }

    fn separator(self) -> u8 {
        match self {
            Self::Tsv => b'\t',
            _ => b',',
        }
    }
}

/// Load a table from a file on disk.
pub fn load_path(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let file_name = path.to_string_lossy().to_string();

    // Check the extension before touching the file system
    DataFormat::from_file_name(&file_name)?;

    let bytes = std::fs::read(path).map_err(|e| CleaningError::LoadFailed {
        source_name: file_name.clone(),
        reason: e.to_string(),
    })?;

    load_bytes(&file_name, bytes)
}

/// Load a table from in-memory file contents, e.g. an upload.
///
/// `file_name` is used for format detection and error messages only.
pub fn load_bytes(file_name: &str, bytes: impl Into<Vec<u8>>) -> Result<DataFrame> {
    let format = DataFormat::from_file_name(file_name)?;
    let bytes = bytes.into();

    let load_failed = |reason: String| CleaningError::LoadFailed {
        source_name: file_name.to_string(),
        reason,
    };

    if bytes.is_empty() {
        return Err(load_failed("file is empty".to_string()));
    }

    let df = match format {
        DataFormat::Csv | DataFormat::Tsv => read_delimited(bytes, format.separator())
            .map_err(|e| load_failed(e.to_string()))?,
        DataFormat::Json => JsonReader::new(Cursor::new(bytes))
            .with_json_format(JsonFormat::Json)
            .finish()
            .map_err(|e| load_failed(e.to_string()))?,
        DataFormat::NdJson => JsonReader::new(Cursor::new(bytes))
            .with_json_format(JsonFormat::JsonLines)
            .finish()
            .map_err(|e| load_failed(e.to_string()))?,
        DataFormat::Parquet => ParquetReader::new(Cursor::new(bytes))
            .finish()
            .map_err(|e| load_failed(e.to_string()))?,
        DataFormat::Excel => spreadsheet::read_first_sheet(bytes).map_err(load_failed)?,
        DataFormat::Xml => xml::read_records(&bytes).map_err(load_failed)?,
    };

    info!(
        "Loaded '{}' ({:?}): {} rows x {} columns",
        file_name,
        format,
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Read delimited text, retrying without quote handling if the first pass
/// fails.
fn read_delimited(bytes: Vec<u8>, separator: u8) -> PolarsResult<DataFrame> {
    // Strategy 1: Standard loading with quote handling
    let first = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(separator)
                .with_quote_char(Some(b'"')),
        )
        .into_reader_with_file_handle(Cursor::new(bytes.clone()))
        .finish();

    match first {
        Ok(df) => Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);

            // Strategy 2: Without quote handling
            CsvReadOptions::default()
                .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
                .with_has_header(true)
                .with_parse_options(
                    CsvParseOptions::default()
                        .with_separator(separator)
                        .with_quote_char(None),
                )
                .into_reader_with_file_handle(Cursor::new(bytes))
                .finish()
        }
    }
}

/// Build a typed column from raw cell text.
///
/// Blank cells become null. The column is Int64 when every present cell
/// parses as an integer, otherwise Float64 when every cell parses as a
/// number, otherwise Boolean when every cell is `true`/`false` (any case),
/// and String in all other cases.
pub(crate) fn typed_column(name: &str, cells: Vec<Option<String>>) -> Column {
    let cells: Vec<Option<String>> = cells
        .into_iter()
        .map(|cell| cell.map(|text| text.trim().to_string()).filter(|text| !text.is_empty()))
        .collect();
    let present = || cells.iter().flatten();

    if present().all(|text| text.parse::<i64>().is_ok()) {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|cell| cell.as_deref().and_then(|text| text.parse().ok()))
            .collect();
        return Column::new(name.into(), values);
    }

    if present().all(|text| text.parse::<f64>().is_ok()) {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| cell.as_deref().and_then(|text| text.parse().ok()))
            .collect();
        return Column::new(name.into(), values);
    }

    let as_bool = |text: &str| {
        if text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    };
    if present().all(|text| as_bool(text).is_some()) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|cell| cell.as_deref().and_then(as_bool))
            .collect();
        return Column::new(name.into(), values);
    }

    Column::new(name.into(), cells)
}

/// Serialize a table as UTF-8 comma-separated text with a header row and no
/// index column.
pub fn to_csv_bytes(df: &DataFrame) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut df = df.clone();

    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .map_err(|e| CleaningError::ExportFailed(e.to_string()))?;

    Ok(buffer)
}

/// Write a table as CSV to `path`.
pub fn write_csv(df: &DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_csv_bytes(df)?;

    std::fs::write(path, bytes).map_err(|e| {
        CleaningError::ExportFailed(format!("could not write '{}': {}", path.display(), e))
    })?;

    info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(DataFormat::from_file_name("a.csv").unwrap(), DataFormat::Csv);
        assert_eq!(DataFormat::from_file_name("A.CSV").unwrap(), DataFormat::Csv);
        assert_eq!(DataFormat::from_file_name("dir/a.tsv").unwrap(), DataFormat::Tsv);
        assert_eq!(DataFormat::from_file_name("a.jsonl").unwrap(), DataFormat::NdJson);
        assert_eq!(DataFormat::from_file_name("a.parquet").unwrap(), DataFormat::Parquet);
    }

    #[test]
    fn test_spreadsheet_and_xml_detection() {
        for name in ["book.xlsx", "macro.XLSM", "old.xls", "sheet.ods"] {
            assert_eq!(DataFormat::from_file_name(name).unwrap(), DataFormat::Excel);
        }
        assert_eq!(DataFormat::from_file_name("feed.xml").unwrap(), DataFormat::Xml);
    }

    #[test]
    fn test_unsupported_formats() {
        for name in ["notes.docx", "image.png", "noext"] {
            let err = load_bytes(name, b"x".to_vec()).unwrap_err();
            assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
            assert!(err.is_load_error());
        }
    }

    #[test]
    fn test_load_csv_bytes() {
        let df = load_bytes("data.csv", "a,b\n1,x\n2,\n3,z\n").unwrap();
        assert_eq!(df.shape(), (3, 2));
        assert_eq!(df.column("a").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("b").unwrap().null_count(), 1);
    }

    #[test]
    fn test_load_quoted_csv() {
        let df = load_bytes("data.csv", "name,city\n\"Doe, Jane\",Paris\n").unwrap();
        assert_eq!(df.shape(), (1, 2));
        let name = df.column("name").unwrap().as_materialized_series().clone();
        assert_eq!(name.str().unwrap().get(0), Some("Doe, Jane"));
    }

    #[test]
    fn test_load_tsv_bytes() {
        let df = load_bytes("data.tsv", "a\tb\n1\t2\n").unwrap();
        assert_eq!(df.shape(), (1, 2));
    }

    #[test]
    fn test_load_json_and_ndjson() {
        let json = load_bytes("data.json", r#"[{"a":1,"b":"x"},{"a":2,"b":null}]"#).unwrap();
        assert_eq!(json.shape(), (2, 2));

        let ndjson = load_bytes("data.ndjson", "{\"a\":1}\n{\"a\":2}\n{\"a\":3}\n").unwrap();
        assert_eq!(ndjson.shape(), (3, 1));
    }

    #[test]
    fn test_malformed_input_is_load_error() {
        let err = load_bytes("data.json", "this is not json").unwrap_err();
        assert_eq!(err.error_code(), "LOAD_FAILED");

        let err = load_bytes("data.csv", Vec::<u8>::new()).unwrap_err();
        assert_eq!(err.error_code(), "LOAD_FAILED");
    }

    #[test]
    fn test_malformed_workbook_is_load_error() {
        let err = load_bytes("book.xlsx", b"not a zip archive".to_vec()).unwrap_err();
        assert_eq!(err.error_code(), "LOAD_FAILED");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_typed_column_inference() {
        let cell = |text: &str| Some(text.to_string());

        let ints = typed_column("n", vec![cell("1"), None, cell(" 3 "), cell("")]);
        assert_eq!(ints.dtype(), &DataType::Int64);
        assert_eq!(ints.null_count(), 2);

        let floats = typed_column("x", vec![cell("1"), cell("2.5"), cell("1e3")]);
        assert_eq!(floats.dtype(), &DataType::Float64);

        let flags = typed_column("b", vec![cell("TRUE"), cell("false"), None]);
        assert_eq!(flags.dtype(), &DataType::Boolean);

        let text = typed_column("s", vec![cell("1"), cell("Paris")]);
        assert_eq!(text.dtype(), &DataType::String);
        let text = text.as_materialized_series().clone();
        assert_eq!(text.str().unwrap().get(0), Some("1"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_path("/definitely/not/here.csv").unwrap_err();
        assert_eq!(err.error_code(), "LOAD_FAILED");
    }

    #[test]
    fn test_to_csv_bytes() {
        let df = df![
            "a" => [Some(1), None],
            "b" => ["x", "y"],
        ]
        .unwrap();
        let text = String::from_utf8(to_csv_bytes(&df).unwrap()).unwrap();
        assert_eq!(text, "a,b\n1,x\n,y\n");
    }

    #[test]
    fn test_parquet_bytes() {
        let mut df = df!["a" => [1.5, 2.5], "b" => ["x", "y"]].unwrap();
        let mut buffer = Vec::new();
        ParquetWriter::new(&mut buffer).finish(&mut df).unwrap();

        let loaded = load_bytes("data.parquet", buffer).unwrap();
        assert!(loaded.equals_missing(&df));
    }

    #[test]
    fn test_write_and_reload_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let df = df!["a" => [1, 2, 3], "b" => ["x", "y", "z"]].unwrap();

        write_csv(&df, &path).unwrap();
        let loaded = load_path(&path).unwrap();

        assert_eq!(loaded.shape(), (3, 2));
        assert_eq!(loaded.get_column_names(), df.get_column_names());
    }
}
