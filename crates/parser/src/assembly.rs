// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Assembly stats extraction from QUAST's `report.tsv` (spec §4.F row 2).
//!
//! Unlike the per-tool ARG files, QUAST's report is a transposed table —
//! one metric per row, the row label in the first column — so the generic
//! header-lookup reader in [`crate::tsv`] doesn't apply (the label column
//! itself legitimately starts with `#`, e.g. `"# contigs"`, which would be
//! misread as a comment by that reader).

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssemblyStats {
    pub num_contigs: Option<u64>,
    pub total_length: Option<u64>,
    pub n50: Option<u64>,
    pub gc_percent: Option<f64>,
}

const CONTIGS_LABELS: &[&str] = &["# contigs", "contigs (>= 0 bp)", "contigs"];
const TOTAL_LENGTH_LABELS: &[&str] = &["total length", "total length (>= 0 bp)"];
const N50_LABEL: &str = "n50";
const GC_LABEL: &str = "gc (%)";

/// Parse a QUAST `report.tsv`. Returns `None` only if the file can't be
/// read at all; a present-but-empty file yields a stats record of all
/// `None`s rather than an error (spec §4.F: every field optional).
pub fn parse_quast_report(path: &Path) -> Option<AssemblyStats> {
    let content = std::fs::read_to_string(path).ok()?;
    let mut stats = AssemblyStats::default();

    for line in content.lines() {
        let mut parts = line.splitn(2, '\t');
        let Some(label) = parts.next() else { continue };
        let Some(value) = parts.next() else { continue };
        let label = label.trim().to_lowercase();
        let value = value.trim();

        if CONTIGS_LABELS.contains(&label.as_str()) {
            stats.num_contigs = value.parse().ok();
        } else if TOTAL_LENGTH_LABELS.contains(&label.as_str()) {
            stats.total_length = value.parse().ok();
        } else if label == N50_LABEL {
            stats.n50 = value.parse().ok();
        } else if label == GC_LABEL {
            stats.gc_percent = value.parse().ok();
        }
    }

    Some(stats)
}

#[cfg(test)]
#[path = "assembly_tests.rs"]
mod tests;
