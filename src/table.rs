//! In-memory representation of one uploaded sales table.
//!
//! Rows are kept as raw strings; derived fields live in side structures
//! (see `derive`) so the source data is never rewritten.

use std::path::Path;

use crate::{
    error::{SalesError, SalesResult},
    io_utils,
};

#[derive(Debug, Clone)]
pub struct Table {
    /// Header names, trimmed and lowercased in source order.
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Raw cell value at `(row, column)`; missing fields in short records
    /// read as empty.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Reads a delimited file into a [`Table`], normalizing every header.
pub fn read_table(path: &Path, delimiter: Option<u8>) -> SalesResult<Table> {
    let delimiter = io_utils::resolve_input_delimiter(path, delimiter);
    let text = io_utils::read_decoded_file(path)?;
    parse_table(text, delimiter)
}

pub fn parse_table(text: String, delimiter: u8) -> SalesResult<Table> {
    let mut reader = io_utils::open_csv_reader(text, delimiter);
    let headers = reader
        .headers()
        .map_err(|err| SalesError::UnreadableFile(err.to_string()))?;
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(SalesError::UnreadableFile("no header row found".into()));
    }
    let columns: Vec<String> = headers.iter().map(normalize_header).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| SalesError::UnreadableFile(err.to_string()))?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(Table { columns, rows })
}
