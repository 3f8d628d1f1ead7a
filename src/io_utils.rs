//! I/O utilities for CSV reading, decoding, and delimiter resolution.
//!
//! All table input flows through this module. Uploaded files are decoded
//! as UTF-8 first and re-decoded as windows-1252 when that fails, matching
//! the permissive single-byte fallback expected of operator-supplied
//! spreadsheets exported from legacy tooling.

use std::{fs, io::Cursor, path::Path};

use encoding_rs::{UTF_8, WINDOWS_1252};

use crate::error::{SalesError, SalesResult};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Decodes raw table bytes, trying UTF-8 strictly before falling back to
/// windows-1252.
pub fn decode_table_bytes(bytes: &[u8]) -> SalesResult<String> {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return Ok(text.into_owned());
    }
    let (text, _, had_errors) = WINDOWS_1252.decode(bytes);
    if had_errors {
        return Err(SalesError::UnreadableFile(
            "file is not valid UTF-8 or windows-1252 text".into(),
        ));
    }
    Ok(text.into_owned())
}

pub fn read_decoded_file(path: &Path) -> SalesResult<String> {
    let bytes = fs::read(path)
        .map_err(|err| SalesError::UnreadableFile(format!("{}: {err}", path.display())))?;
    decode_table_bytes(&bytes)
}

pub fn open_csv_reader(text: String, delimiter: u8) -> csv::Reader<Cursor<String>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(Cursor::new(text))
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
