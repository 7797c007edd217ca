//! Spreadsheet reader (xlsx, xlsm, xls, ods).

use super::typed_column;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Read the first sheet of a workbook. The first row holds the column names;
/// a blank header cell is named `column_<n>` (1-based).
pub(super) fn read_first_sheet(bytes: Vec<u8>) -> std::result::Result<DataFrame, String> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| e.to_string())?;

    let sheet_names = workbook.sheet_names();
    let sheet = sheet_names
        .first()
        .ok_or_else(|| "workbook has no sheets".to_string())?;
    if sheet_names.len() > 1 {
        debug!(
            "Workbook has {} sheets; reading '{}' only",
            sheet_names.len(),
            sheet
        );
    }

    let range = workbook.worksheet_range(sheet).map_err(|e| e.to_string())?;
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| format!("sheet '{}' is empty", sheet))?;

    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| cell_text(cell).unwrap_or_else(|| format!("column_{}", i + 1)))
        .collect();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (column, cell) in cells.iter_mut().zip(row) {
            column.push(cell_text(cell));
        }
    }

    let columns = names
        .iter()
        .zip(cells)
        .map(|(name, values)| typed_column(name, values))
        .collect();
    DataFrame::new(columns).map_err(|e| e.to_string())
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(text) => Some(text.clone()),
        Data::Float(value) => Some(value.to_string()),
        Data::Int(value) => Some(value.to_string()),
        Data::Bool(value) => Some(value.to_string()),
        other => Some(other.to_string()),
    }
}
