// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state built from WAL replay.

use megarg_core::{DatabaseAsset, DownloadState, Job, JobEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Materialized state derived from the event log.
///
/// Holds the current view of every job and database asset. Never mutated
/// directly outside of [`MaterializedState::apply_event`]; all changes flow
/// through events so that replaying the WAL from a snapshot reproduces the
/// exact same state.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MaterializedState {
    pub jobs: HashMap<String, Job>,
    #[serde(default)]
    pub assets: HashMap<String, DatabaseAsset>,
}

impl MaterializedState {
    /// Get a job by ID or unique prefix (like git commit hashes).
    pub fn get_job(&self, id: &str) -> Option<&Job> {
        if let Some(job) = self.jobs.get(id) {
            return Some(job);
        }
        let matches: Vec<_> = self.jobs.iter().filter(|(k, _)| k.starts_with(id)).collect();
        if matches.len() == 1 {
            Some(matches[0].1)
        } else {
            None
        }
    }

    pub fn list_jobs(&self) -> Vec<&Job> {
        self.jobs.values().collect()
    }

    pub fn get_asset(&self, key: &str) -> Option<&DatabaseAsset> {
        self.assets.get(key)
    }

    pub fn list_assets(&self) -> Vec<&DatabaseAsset> {
        self.assets.values().collect()
    }

    /// Apply an event to derive state changes.
    ///
    /// This is the event-sourcing approach where state is derived from events.
    /// Events are facts about what happened; state is derived from those facts.
    ///
    /// # Idempotency requirement
    ///
    /// All handlers below must be idempotent: applying the same event twice
    /// must produce the same state as applying it once, since replay from
    /// a snapshot re-applies every WAL entry after the snapshot's sequence.
    pub fn apply_event(&mut self, event: &JobEvent) {
        match event {
            JobEvent::JobCreated { job } => {
                self.jobs.entry(job.id.to_string()).or_insert_with(|| job.clone());
            }

            JobEvent::JobStatusChanged {
                id,
                status,
                pid,
                run_number,
                output_dir,
                started_at_ms,
                completed_at_ms,
                exit_code,
                error_message,
            } => {
                if let Some(job) = self.jobs.get_mut(id.as_str()) {
                    job.status = *status;
                    // `pid` is meaningful only while RUNNING (invariant 5):
                    // clear it on every other transition regardless of what
                    // the event carries, rather than trusting callers to
                    // pass an explicit clear.
                    if *status == megarg_core::JobStatus::Running {
                        if let Some(pid) = pid {
                            job.pid = Some(*pid);
                        }
                    } else {
                        job.pid = None;
                    }
                    if let Some(run_number) = run_number {
                        job.run_number = Some(*run_number);
                    }
                    if let Some(output_dir) = output_dir {
                        job.output_dir = Some(output_dir.clone());
                    }
                    if let Some(started_at_ms) = started_at_ms {
                        job.started_at_ms = Some(*started_at_ms);
                    }
                    if let Some(completed_at_ms) = completed_at_ms {
                        job.completed_at_ms = Some(*completed_at_ms);
                    }
                    if let Some(exit_code) = exit_code {
                        job.exit_code = Some(*exit_code);
                    }
                    if let Some(error_message) = error_message {
                        job.error_message = Some(error_message.clone());
                    }
                }
            }

            JobEvent::JobProgressUpdated {
                id,
                percent,
                step,
                preview_line,
            } => {
                if let Some(job) = self.jobs.get_mut(id.as_str()) {
                    // Progress is monotonic: a stale or out-of-order update
                    // must never move the reported percentage backwards.
                    job.progress_percent = job.progress_percent.max(*percent);
                    job.current_step = step.clone();
                    if let Some(line) = preview_line {
                        job.logs_preview.push(line.clone());
                    }
                }
            }

            JobEvent::JobDeleted { id } => {
                if let Some(job) = self.jobs.get_mut(id.as_str()) {
                    job.deleted = true;
                }
            }

            JobEvent::AssetStateChanged {
                key,
                display_name,
                install_path,
                required,
                download_state,
                download_progress_percent,
                last_error,
            } => {
                let asset = self.assets.entry(key.to_string()).or_insert_with(|| {
                    DatabaseAsset::new(key.clone(), key.to_string(), Default::default(), false)
                });
                if let Some(display_name) = display_name {
                    asset.display_name = display_name.clone();
                }
                if let Some(install_path) = install_path {
                    asset.install_path = install_path.clone();
                }
                if let Some(required) = required {
                    asset.required = *required;
                }
                if let Some(download_state) = download_state {
                    asset.download_state = *download_state;
                    if *download_state != DownloadState::Downloading {
                        asset.download_progress_percent = 0;
                    }
                }
                if let Some(percent) = download_progress_percent {
                    asset.download_progress_percent = *percent;
                }
                if let Some(last_error) = last_error {
                    asset.last_error = Some(last_error.clone());
                } else if matches!(download_state, Some(DownloadState::Idle)) {
                    asset.last_error = None;
                }
            }
        }
    }

    /// Overwrite the filesystem-probed fields (`installed`, `size_bytes`) on
    /// an asset. Never event-sourced: these are recomputed from disk on
    /// every read and deliberately not trusted from a prior write.
    pub fn set_asset_probe(&mut self, key: &str, installed: bool, size_bytes: u64) {
        if let Some(asset) = self.assets.get_mut(key) {
            asset.installed = installed;
            asset.size_bytes = size_bytes;
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
