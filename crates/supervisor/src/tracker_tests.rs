// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn no_marker_has_fired_yet_is_initializing_zero() {
    let mut state = JobProgressState::default();
    let tracker = ProgressTracker::new();

    let (percent, step) = state.observe_line(&tracker, "unrecognized chatter");
    assert_eq!(percent, 0);
    assert_eq!(step, "initializing");
}

#[test]
fn matching_line_advances_phase_and_percent() {
    let mut state = JobProgressState::default();
    let tracker = ProgressTracker::new();

    let (percent, step) = state.observe_line(&tracker, "Downloading SRR28083254 from SRA");
    assert_eq!(step, "downloading");
    assert!(percent > 0);
}

#[test]
fn percent_never_decreases_across_lines() {
    let mut state = JobProgressState::default();
    let tracker = ProgressTracker::new();

    let (high, _) = state.observe_line(&tracker, "running prokka annotation now");
    // A stray line that incidentally matches an earlier, lower-percent phase
    // must not move the reported percentage backwards.
    let (after, step) = state.observe_line(&tracker, "Downloading reference index");
    assert_eq!(after, high);
    assert_eq!(step, "downloading");
}

#[test]
fn first_matching_marker_in_declared_order_wins() {
    let tracker = ProgressTracker::new();
    // Line mentions both "download" and "report" - download is declared first.
    let (phase, _) = tracker
        .on_line("download report template fetched")
        .expect("should match");
    assert_eq!(phase, "downloading");
}

#[test]
fn arg_detection_requires_both_tool_and_verb() {
    let tracker = ProgressTracker::new();
    assert!(tracker.on_line("amrfinderplus: scanning contigs for resistance genes").is_some());
    assert!(tracker.on_line("amrfinderplus version 3.12").is_none());
}

#[test]
fn unmatched_line_does_not_advance_phase() {
    let tracker = ProgressTracker::new();
    assert!(tracker.on_line("some unrelated diagnostic chatter").is_none());
}
