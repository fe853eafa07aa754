// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Priority classification for a detected resistance gene (spec §4.F):
//! a case-insensitive substring match against the gene's resistance/class
//! field, first match wins, closed vocabulary of four buckets.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

const CRITICAL: &[&str] = &["carbapenem", "colistin", "vancomycin", "mrsa", "linezolid"];
const HIGH: &[&str] = &["beta-lactam", "fluoroquinolone", "aminoglycoside", "esbl"];
const MEDIUM: &[&str] = &[
    "tetracycline",
    "sulfonamide",
    "trimethoprim",
    "chloramphenicol",
];

/// Classify a gene's priority from its resistance/class text. Absence of
/// any field classifies as `LOW`, matching "anything else" in spec §4.F.
pub fn classify_priority(resistance_or_class: Option<&str>) -> Priority {
    let Some(text) = resistance_or_class else {
        return Priority::Low;
    };
    let lower = text.to_lowercase();
    if CRITICAL.iter().any(|s| lower.contains(s)) {
        Priority::Critical
    } else if HIGH.iter().any(|s| lower.contains(s)) {
        Priority::High
    } else if MEDIUM.iter().any(|s| lower.contains(s)) {
        Priority::Medium
    } else {
        Priority::Low
    }
}

#[cfg(test)]
#[path = "priority_tests.rs"]
mod tests;
