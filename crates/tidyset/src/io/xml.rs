//! Flat XML record reader.
//!
//! Every child of the root element is one record; its attributes and its
//! child elements are the record's fields:
//!
//! ```text
//! <readings>
//!   <reading id="1"><site>North</site><value>3.5</value></reading>
//!   <reading id="2"><site>South</site><value/></reading>
//! </readings>
//! ```
//!
//! Columns appear in first-seen order. A record that lacks a field, or has
//! it empty, gets null. Anything nested below a field is flattened into the
//! field's text.

use super::typed_column;
use polars::prelude::*;
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};

const RECORD_DEPTH: usize = 2;
const FIELD_DEPTH: usize = 3;

/// Column-wise accumulator for records of unknown shape.
#[derive(Debug, Default)]
struct RecordTable {
    names: Vec<String>,
    columns: Vec<Vec<Option<String>>>,
    rows: usize,
}

impl RecordTable {
    fn start_record(&mut self) {
        self.rows += 1;
    }

    /// Set a field of the current record. A repeated field keeps its last
    /// value.
    fn set(&mut self, name: &str, value: Option<String>) {
        let index = match self.names.iter().position(|n| n == name) {
            Some(index) => index,
            None => {
                self.names.push(name.to_string());
                self.columns.push(Vec::new());
                self.names.len() - 1
            }
        };
        let Some(column) = self.columns.get_mut(index) else {
            return;
        };

        if column.len() == self.rows {
            if let Some(last) = column.last_mut() {
                *last = value;
            }
        } else {
            column.resize(self.rows - 1, None);
            column.push(value);
        }
    }

    fn set_attributes(&mut self, element: &BytesStart) -> std::result::Result<(), String> {
        for attribute in element.attributes() {
            let attribute = attribute.map_err(|e| e.to_string())?;
            if attribute.key.as_namespace_binding().is_some() {
                continue;
            }
            let name = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let value = attribute.unescape_value().map_err(|e| e.to_string())?;
            self.set(&name, Some(value.into_owned()));
        }
        Ok(())
    }

    fn finish(self) -> std::result::Result<DataFrame, String> {
        let rows = self.rows;
        let columns = self
            .names
            .iter()
            .zip(self.columns)
            .map(|(name, mut values)| {
                values.resize(rows, None);
                typed_column(name, values)
            })
            .collect();
        DataFrame::new(columns).map_err(|e| e.to_string())
    }
}

fn element_name(element: &BytesStart) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

/// Text of a `&...;` reference. Unknown entities are kept verbatim.
fn resolve_reference(reference: &BytesRef) -> std::result::Result<String, String> {
    if let Some(ch) = reference.resolve_char_ref().map_err(|e| e.to_string())? {
        return Ok(ch.to_string());
    }
    let name = reference.decode().map_err(|e| e.to_string())?;
    Ok(match resolve_predefined_entity(&name) {
        Some(text) => text.to_string(),
        None => format!("&{};", name),
    })
}

/// Read flat records from an XML document.
pub(super) fn read_records(bytes: &[u8]) -> std::result::Result<DataFrame, String> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut table = RecordTable::default();
    let mut depth = 0;
    // Name and text of the field being read
    let mut field: Option<(String, String)> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| format!("invalid XML at byte {}: {}", reader.error_position(), e))?;

        match event {
            Event::Start(element) => {
                depth += 1;
                if depth == RECORD_DEPTH {
                    table.start_record();
                    table.set_attributes(&element)?;
                } else if depth == FIELD_DEPTH {
                    field = Some((element_name(&element), String::new()));
                }
            }
            Event::Empty(element) => {
                if depth + 1 == RECORD_DEPTH {
                    table.start_record();
                    table.set_attributes(&element)?;
                } else if depth + 1 == FIELD_DEPTH {
                    table.set(&element_name(&element), None);
                }
            }
            Event::End(_) => {
                if depth == FIELD_DEPTH
                    && let Some((name, text)) = field.take()
                {
                    table.set(&name, Some(text));
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(text) => {
                if let Some((_, value)) = field.as_mut() {
                    value.push_str(&text.decode().map_err(|e| e.to_string())?);
                }
            }
            Event::CData(data) => {
                if let Some((_, value)) = field.as_mut() {
                    value.push_str(&data.decode().map_err(|e| e.to_string())?);
                }
            }
            Event::GeneralRef(reference) => {
                if let Some((_, value)) = field.as_mut() {
                    value.push_str(&resolve_reference(&reference)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if table.rows == 0 {
        return Err("no records found below the root element".to_string());
    }
    table.finish()
}
