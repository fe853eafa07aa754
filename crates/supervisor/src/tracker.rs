// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress tracker (component E): turns lines from the child's stdout into
//! `(phase, percent)` updates. A plain regex table, matched in declared
//! order — first match wins, matching the teacher's own preference for
//! table-driven matching over ad-hoc per-case functions.

use regex::Regex;
use std::sync::LazyLock;

/// Phase vocabulary (closed set), exposed verbatim in `current_step`.
pub const PHASE_INITIALIZING: &str = "initializing";

struct PhaseMarker {
    pattern: Regex,
    phase: &'static str,
    percent_at_entry: u8,
}

static MARKERS: LazyLock<Vec<PhaseMarker>> = LazyLock::new(|| {
    let entries: &[(&str, &str, u8)] = &[
        (r"(?i)download(ing)?\b", "downloading", 5),
        (r"(?i)quality[ _-]?control|fastqc|quality check", "quality_control", 15),
        (r"(?i)assembl(y|ing)|spades|unicycler", "assembly", 30),
        (r"(?i)annotat(e|ion|ing)|prokka", "annotation", 50),
        (
            r"(?i)(arg|resistance gene|amrfinder|resfinder|card|rgi)\b.*(detect|scan)",
            "arg_detection",
            65,
        ),
        (r"(?i)variant[ _-]?call(ing)?", "variant_calling", 80),
        (r"(?i)report(ing)?\b", "reporting", 90),
        (r"(?i)finaliz(e|ing)", "finalizing", 97),
    ];
    entries
        .iter()
        .map(|(pattern, phase, percent)| PhaseMarker {
            pattern: Regex::new(pattern).expect("static pattern is valid"),
            phase,
            percent_at_entry: *percent,
        })
        .collect()
});

/// Stateless phase-marker table. Shared across every running job.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressTracker;

impl ProgressTracker {
    pub fn new() -> Self {
        Self
    }

    /// First marker (in declared order) whose pattern matches `line`.
    pub fn on_line(&self, line: &str) -> Option<(&'static str, u8)> {
        MARKERS
            .iter()
            .find(|m| m.pattern.is_match(line))
            .map(|m| (m.phase, m.percent_at_entry))
    }
}

/// Per-job mutable progress, held by the supervisor while a child runs.
/// `percent` never decreases; a line that matches no marker still advances
/// the preview without changing `step`/`percent`.
#[derive(Debug, Clone)]
pub struct JobProgressState {
    percent: u8,
    step: String,
}

impl Default for JobProgressState {
    fn default() -> Self {
        Self {
            percent: 0,
            step: PHASE_INITIALIZING.to_string(),
        }
    }
}

impl JobProgressState {
    /// Observe a new line, returning the `(percent, step)` to persist
    /// alongside it. The caller is responsible for bounding the preview ring
    /// (spec §4.E: ~200 lines); that bound lives in `Job::logs_preview`.
    pub fn observe_line(&mut self, tracker: &ProgressTracker, line: &str) -> (u8, String) {
        if let Some((phase, percent)) = tracker.on_line(line) {
            self.percent = self.percent.max(percent);
            self.step = phase.to_string();
        }
        (self.percent, self.step.clone())
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
