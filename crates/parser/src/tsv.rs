// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Header-name tabular reading shared by every per-tool parser in
//! [`crate::tools`]. Tools version their column order, so lookup is always
//! by header name, never by position (spec §4.F).

use crate::error::ParserError;
use std::collections::HashMap;
use std::path::Path;

/// One parsed data row, keyed by (trimmed) header name.
pub type Row = HashMap<String, String>;

/// Read a delimited file whose first non-`#` line is the header.
///
/// Lines starting with `#` are comments, skipped wherever they occur
/// (before or interleaved with data, matching the external tools' habit of
/// emitting a version banner before the header row). Missing columns in a
/// given row simply aren't present in the returned map — callers treat a
/// missing key the same as an empty value.
pub fn read_rows(path: &Path, delimiter: u8) -> Result<Vec<Row>, ParserError> {
    let map_err = |source: std::io::Error| ParserError::Io {
        path: path.display().to_string(),
        source,
    };
    let bytes = std::fs::read(path).map_err(map_err)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .comment(Some(b'#'))
        .flexible(true)
        .has_headers(true)
        .from_reader(bytes.as_slice());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| ParserError::Csv {
            path: path.display().to_string(),
            source,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| ParserError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        let mut row = Row::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(idx) {
                row.insert(header.clone(), value.trim().to_string());
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Look up a column by header name, case-insensitively, tolerating the
/// small naming variations between tool versions (e.g. `Identity` vs
/// `%Identity`).
pub fn get<'a>(row: &'a Row, name: &str) -> Option<&'a str> {
    row.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
        .filter(|v| !v.is_empty())
}

/// Parse a numeric column; a present-but-unparsable value yields `None`
/// rather than a hard failure (spec §4.F: "numeric columns that fail to
/// parse yield `null`, not a hard failure").
pub fn get_f64(row: &Row, name: &str) -> Option<f64> {
    get(row, name).and_then(|v| v.trim_end_matches('%').parse::<f64>().ok())
}

#[cfg(test)]
#[path = "tsv_tests.rs"]
mod tests;
