// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tagged gene-hit record (spec §9 redesign flag: "recast dynamic dict-shaped
//! result objects as tagged records with optional fields").

use crate::priority::Priority;
use serde::{Deserialize, Serialize};

/// A single resistance/virulence gene hit, tagged with the tool that
/// produced it. Every field beyond `tool` is optional — the source TSV may
/// be missing any of them (spec §4.F).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneHit {
    pub tool: String,
    pub gene: Option<String>,
    pub element_type: Option<String>,
    pub class: Option<String>,
    pub identity_percent: Option<f64>,
    pub coverage_percent: Option<f64>,
    pub method: Option<String>,
    pub product: Option<String>,
    pub resistance: Option<String>,
    pub contig: Option<String>,
    pub drug_class: Option<String>,
    pub mechanism: Option<String>,
    pub priority: Priority,
}

impl GeneHit {
    /// The field this hit's priority is classified from: `resistance`
    /// takes precedence over `class`/`drug_class` when both are present,
    /// matching the per-tool column each field is actually populated from.
    pub fn priority_source(&self) -> Option<&str> {
        self.resistance
            .as_deref()
            .or(self.class.as_deref())
            .or(self.drug_class.as_deref())
    }
}

/// Per-tool grouping of gene hits (spec §6 `arg_detection.<tool>`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub num_genes: usize,
    pub genes: Vec<GeneHit>,
}
