// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `METADATA.json` and `06_analysis/features_ml.csv` extraction (spec §4.F
//! rows 1 and 6). Both are "echo as-is" style fields: parsed and returned
//! verbatim, no business logic applied.

use std::collections::HashMap;
use std::path::Path;

/// Parse `METADATA.json` as-is. `Ok(None)` if absent; `Err` only for a
/// present-but-invalid file (spec §4.F: "never throws on absence, only on
/// structurally invalid present files" — callers turn that `Err` into a
/// `parse_warnings[]` entry, not a hard failure of the whole parse).
pub fn read_metadata(output_dir: &Path) -> Result<Option<serde_json::Value>, String> {
    let path = output_dir.join("METADATA.json");
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| e.to_string())
}

/// Parse the first (only) data row of `06_analysis/features_ml.csv` as a
/// header-name-keyed map.
pub fn read_features_ml(output_dir: &Path) -> Result<Option<HashMap<String, String>>, String> {
    let path = output_dir.join("06_analysis/features_ml.csv");
    if !path.is_file() {
        return Ok(None);
    }
    let rows = crate::tsv::read_rows(&path, b',').map_err(|e| e.to_string())?;
    Ok(rows.into_iter().next())
}

/// Absolute path to the ARG professional HTML report, if present (spec
/// §4.F row 7: "absolute path only" — no content extraction).
pub fn find_report_html(output_dir: &Path, sample_id: &str) -> Option<std::path::PathBuf> {
    let path = output_dir.join(format!(
        "06_analysis/reports/{sample_id}_ARG_professional_report.html"
    ));
    path.is_file().then_some(path)
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
