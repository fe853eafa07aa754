// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-tool ARG/virulence extraction, table-driven per spec §9: a table of
//! `{tool_key, relative_path_template, row_mapper}` tuples, iterated once
//! instead of one ad-hoc function per tool.

use crate::gene::GeneHit;
use crate::priority::classify_priority;
use crate::tsv::{self, Row};
use std::path::PathBuf;

type RowMapper = fn(&Row, tool: &str) -> GeneHit;

struct ToolEntry {
    key: &'static str,
    relative_path: fn(sample_id: &str) -> PathBuf,
    delimiter: u8,
    mapper: RowMapper,
}

/// The five databases sharing one column shape (spec §4.F row 3) plus the
/// two tools with their own shape (amrfinderplus, rgi).
static TOOL_TABLE: &[ToolEntry] = &[
    ToolEntry {
        key: "amrfinderplus",
        relative_path: |s| {
            PathBuf::from(format!(
                "04_arg_detection/amrfinderplus/{s}_amrfinderplus.tsv"
            ))
        },
        delimiter: b'\t',
        mapper: map_amrfinderplus_row,
    },
    ToolEntry {
        key: "resfinder",
        relative_path: |s| PathBuf::from(format!("04_arg_detection/resfinder/{s}_resfinder.tsv")),
        delimiter: b'\t',
        mapper: map_standard_row,
    },
    ToolEntry {
        key: "card",
        relative_path: |s| PathBuf::from(format!("04_arg_detection/card/{s}_card.tsv")),
        delimiter: b'\t',
        mapper: map_standard_row,
    },
    ToolEntry {
        key: "ncbi",
        relative_path: |s| PathBuf::from(format!("04_arg_detection/ncbi/{s}_ncbi.tsv")),
        delimiter: b'\t',
        mapper: map_standard_row,
    },
    ToolEntry {
        key: "vfdb",
        relative_path: |s| PathBuf::from(format!("04_arg_detection/vfdb/{s}_vfdb.tsv")),
        delimiter: b'\t',
        mapper: map_standard_row,
    },
    ToolEntry {
        key: "plasmidfinder",
        relative_path: |s| {
            PathBuf::from(format!(
                "04_arg_detection/plasmidfinder/{s}_plasmidfinder.tsv"
            ))
        },
        delimiter: b'\t',
        mapper: map_standard_row,
    },
    ToolEntry {
        key: "rgi",
        relative_path: |s| PathBuf::from(format!("04_arg_detection/rgi/{s}_rgi.txt")),
        delimiter: b'\t',
        mapper: map_rgi_row,
    },
];

fn map_amrfinderplus_row(row: &Row, tool: &str) -> GeneHit {
    let class = tsv::get(row, "class").map(str::to_string);
    let mut hit = GeneHit {
        tool: tool.to_string(),
        gene: tsv::get(row, "gene symbol")
            .or_else(|| tsv::get(row, "gene"))
            .map(str::to_string),
        element_type: tsv::get(row, "element type").map(str::to_string),
        class: class.clone(),
        identity_percent: tsv::get_f64(row, "% identity to reference sequence")
            .or_else(|| tsv::get_f64(row, "identity")),
        coverage_percent: None,
        method: tsv::get(row, "method").map(str::to_string),
        product: None,
        resistance: None,
        contig: tsv::get(row, "contig id").map(str::to_string),
        drug_class: None,
        mechanism: None,
        priority: classify_priority(None),
    };
    hit.priority = classify_priority(hit.priority_source());
    hit
}

fn map_standard_row(row: &Row, tool: &str) -> GeneHit {
    let resistance = tsv::get(row, "resistance")
        .or_else(|| tsv::get(row, "phenotype"))
        .map(str::to_string);
    let mut hit = GeneHit {
        tool: tool.to_string(),
        gene: tsv::get(row, "gene").map(str::to_string),
        element_type: None,
        class: tsv::get(row, "class").map(str::to_string),
        identity_percent: tsv::get_f64(row, "identity")
            .or_else(|| tsv::get_f64(row, "%identity"))
            .or_else(|| tsv::get_f64(row, "identity%")),
        coverage_percent: tsv::get_f64(row, "coverage")
            .or_else(|| tsv::get_f64(row, "%coverage"))
            .or_else(|| tsv::get_f64(row, "coverage%")),
        method: None,
        product: tsv::get(row, "product").map(str::to_string),
        resistance: resistance.clone(),
        contig: tsv::get(row, "contig").map(str::to_string),
        drug_class: None,
        mechanism: None,
        priority: classify_priority(None),
    };
    hit.priority = classify_priority(hit.priority_source());
    hit
}

fn map_rgi_row(row: &Row, tool: &str) -> GeneHit {
    let drug_class = tsv::get(row, "drug class").map(str::to_string);
    let mut hit = GeneHit {
        tool: tool.to_string(),
        gene: tsv::get(row, "best_hit_aro")
            .or_else(|| tsv::get(row, "best hit aro"))
            .map(str::to_string),
        element_type: None,
        class: None,
        identity_percent: None,
        coverage_percent: None,
        method: None,
        product: None,
        resistance: None,
        contig: tsv::get(row, "contig").map(str::to_string),
        drug_class: drug_class.clone(),
        mechanism: tsv::get(row, "resistance mechanism")
            .or_else(|| tsv::get(row, "mechanism"))
            .map(str::to_string),
        priority: classify_priority(None),
    };
    hit.priority = classify_priority(hit.priority_source());
    hit
}

/// A tool's file was present but failed to parse (spec §7: skip the file,
/// attach a warning, return the rest).
#[derive(Debug, Clone)]
pub struct ToolParseWarning {
    pub tool: &'static str,
    pub relative_path: PathBuf,
    pub message: String,
}

/// Extract every present tool's gene list from `output_dir`. Absent files
/// are silently skipped (not an error); present-but-malformed files
/// produce a warning and are skipped, never aborting the whole parse.
pub fn extract_all(
    output_dir: &std::path::Path,
    sample_id: &str,
) -> (Vec<(&'static str, crate::gene::ToolResult)>, Vec<ToolParseWarning>) {
    let mut results = Vec::new();
    let mut warnings = Vec::new();

    for entry in TOOL_TABLE {
        let relative_path = (entry.relative_path)(sample_id);
        let path = output_dir.join(&relative_path);
        if !path.is_file() {
            continue;
        }
        match tsv::read_rows(&path, entry.delimiter) {
            Ok(rows) => {
                let genes: Vec<GeneHit> =
                    rows.iter().map(|row| (entry.mapper)(row, entry.key)).collect();
                results.push((
                    entry.key,
                    crate::gene::ToolResult {
                        num_genes: genes.len(),
                        genes,
                    },
                ));
            }
            Err(e) => {
                tracing::warn!(tool = entry.key, error = %e, "skipping unparsable ARG detection file");
                warnings.push(ToolParseWarning {
                    tool: entry.key,
                    relative_path,
                    message: e.to_string(),
                });
            }
        }
    }

    (results, warnings)
}

#[cfg(test)]
#[path = "tools_tests.rs"]
mod tests;
