// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events written to the durable write-ahead log (component A).
//!
//! State is derived from these facts, not mutated directly — the storage
//! crate's `MaterializedState::apply_event` is the only place that turns an
//! event into a change. All handlers must be idempotent: replaying the same
//! event twice (once for immediate visibility, once during WAL replay after
//! a restart) must leave the state unchanged the second time.

use crate::asset::{AssetKey, DownloadState};
use crate::job::{Job, JobId, JobStatus};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JobEvent {
    /// A new job row was created with `status = PENDING` (component A `create_job`).
    JobCreated { job: Job },

    /// A status transition, validated against the table in §4.A before this
    /// event is ever constructed. Carries every field that changes alongside
    /// the transition so a single event is a single atomic write.
    JobStatusChanged {
        id: JobId,
        status: JobStatus,
        pid: Option<u32>,
        run_number: Option<u32>,
        output_dir: Option<PathBuf>,
        started_at_ms: Option<u64>,
        completed_at_ms: Option<u64>,
        exit_code: Option<i32>,
        error_message: Option<String>,
    },

    /// An unconditional progress merge (component A `update_progress`);
    /// `percent` is only ever applied as `max(old, new)`.
    JobProgressUpdated {
        id: JobId,
        percent: u8,
        step: String,
        preview_line: Option<String>,
    },

    /// An explicit DELETE; `output_dir` removal is best-effort and happens
    /// before this event is emitted.
    JobDeleted { id: JobId },

    /// Registers a known asset (first occurrence) or records a change to its
    /// background download state. Never carries `installed`/`size_bytes` —
    /// those are always derived from a filesystem probe at read time, never
    /// trusted from a prior write.
    AssetStateChanged {
        key: AssetKey,
        display_name: Option<String>,
        install_path: Option<PathBuf>,
        required: Option<bool>,
        download_state: Option<DownloadState>,
        download_progress_percent: Option<u8>,
        last_error: Option<String>,
    },
}

impl JobEvent {
    /// The job this event pertains to, or `None` for asset events.
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            JobEvent::JobCreated { job } => Some(&job.id),
            JobEvent::JobStatusChanged { id, .. } => Some(id),
            JobEvent::JobProgressUpdated { id, .. } => Some(id),
            JobEvent::JobDeleted { id } => Some(id),
            JobEvent::AssetStateChanged { .. } => None,
        }
    }
}
