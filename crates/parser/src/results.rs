// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level output parse (component F): walks a completed job's
//! `output_dir` and produces a [`ParsedResults`] record. Every field is
//! optional; the operation only ever fails on an I/O error reading the
//! directory itself, never on an individual missing or malformed file.

use crate::assembly::{self, AssemblyStats};
use crate::gene::ToolResult;
use crate::metadata;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseWarning {
    pub file: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedResults {
    pub metadata: Option<serde_json::Value>,
    pub assembly_stats: Option<AssemblyStats>,
    pub arg_detection: BTreeMap<String, ToolResult>,
    pub total_arg_genes: usize,
    pub unique_resistance_types: Vec<String>,
    pub report_html_path: Option<PathBuf>,
    pub features_ml: Option<std::collections::HashMap<String, String>>,
    pub output_directory: PathBuf,
    pub parse_warnings: Vec<ParseWarning>,
}

/// Parse a completed job's run directory (spec §4.F).
pub fn parse(output_dir: &Path, sample_id: &str) -> ParsedResults {
    let mut warnings = Vec::new();

    let metadata = match metadata::read_metadata(output_dir) {
        Ok(value) => value,
        Err(message) => {
            tracing::warn!(error = %message, "failed to parse METADATA.json");
            warnings.push(ParseWarning {
                file: "METADATA.json".to_string(),
                message,
            });
            None
        }
    };

    let assembly_stats = assembly::parse_quast_report(&output_dir.join("02_assembly/quast/report.tsv"));

    let (tool_results, tool_warnings) = crate::tools::extract_all(output_dir, sample_id);
    for w in tool_warnings {
        warnings.push(ParseWarning {
            file: w.relative_path.display().to_string(),
            message: w.message,
        });
    }
    let arg_detection: BTreeMap<String, ToolResult> = tool_results.into_iter().collect();

    let features_ml = match metadata::read_features_ml(output_dir) {
        Ok(value) => value,
        Err(message) => {
            tracing::warn!(error = %message, "failed to parse features_ml.csv");
            warnings.push(ParseWarning {
                file: "06_analysis/features_ml.csv".to_string(),
                message,
            });
            None
        }
    };

    let report_html_path = metadata::find_report_html(output_dir, sample_id);

    let (total_arg_genes, unique_resistance_types) = aggregate(&arg_detection);

    ParsedResults {
        metadata,
        assembly_stats,
        arg_detection,
        total_arg_genes,
        unique_resistance_types,
        report_html_path,
        features_ml,
        output_directory: output_dir.to_path_buf(),
        parse_warnings: warnings,
    }
}

/// Union of all per-tool gene lists, deduplicated by `(gene, tool)`, plus
/// the deduplicated set of resistance-type strings across every hit (spec
/// §4.F "Aggregation").
fn aggregate(arg_detection: &BTreeMap<String, ToolResult>) -> (usize, Vec<String>) {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut resistance_types: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();

    for (tool, result) in arg_detection {
        for hit in &result.genes {
            if let Some(gene) = &hit.gene {
                seen.insert((gene.clone(), tool.clone()));
            }
            if let Some(source) = hit.priority_source() {
                resistance_types.insert(source.to_string());
            }
        }
    }

    (seen.len(), resistance_types.into_iter().collect())
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
