// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `JobStore`: the durable persistence API (component A) that wraps the
//! write-ahead log, periodic checkpointing, and the in-memory materialized
//! state behind a single lock.
//!
//! Writers append to the WAL and apply the same event to the in-memory
//! state directly (for immediate read-your-writes visibility) rather than
//! waiting on a replay loop — this store has no separate daemon process
//! reading its own WAL back, unlike the checkpoint module's background
//! thread, which only ever *writes*.

use crate::{Checkpointer, CheckpointError, MaterializedState, SnapshotError, Wal, WalError};
use megarg_core::{CoreError, IdGen, Job, JobConfig, JobEvent, JobId, JobStatus, UuidIdGen};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Wal(#[from] WalError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    #[error(transparent)]
    Domain(#[from] CoreError),
    #[error("job {0} not found")]
    NotFound(String),
}

/// Checkpoint after this many applied events, bounding WAL replay time on
/// the next startup.
const CHECKPOINT_EVERY_N_EVENTS: u64 = 500;

fn epoch_ms_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Durable job store: WAL + periodic snapshot + materialized state, all
/// behind one lock. One instance per daemon process.
///
/// Generic over the ID generator so tests can substitute
/// [`megarg_core::SequentialIdGen`] for deterministic job IDs; production
/// code always uses the default [`UuidIdGen`].
pub struct JobStore<G: IdGen = UuidIdGen> {
    inner: Mutex<Inner>,
    checkpointer: Checkpointer,
    snapshot_path: PathBuf,
    id_gen: G,
}

struct Inner {
    wal: Wal,
    state: MaterializedState,
    events_since_checkpoint: u64,
}

impl JobStore<UuidIdGen> {
    /// Open (or create) a store rooted at `dir`, replaying the WAL on top
    /// of the most recent snapshot.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        Self::open_with_id_gen(dir, UuidIdGen)
    }
}

impl<G: IdGen> JobStore<G> {
    /// Open (or create) a store using a custom ID generator (for tests).
    pub fn open_with_id_gen(dir: &Path, id_gen: G) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir)?;
        let snapshot_path = dir.join("snapshot.zst");
        let wal_path = dir.join("wal.jsonl");

        let snapshot = crate::load_snapshot(&snapshot_path)?;
        let (mut state, processed_seq) = match snapshot {
            Some(snap) => (snap.state, snap.seq),
            None => (MaterializedState::default(), 0),
        };

        let mut wal = Wal::open(&wal_path, processed_seq)?;
        for entry in wal.entries_after(processed_seq)? {
            state.apply_event(&entry.event);
            wal.mark_processed(entry.seq);
        }

        Ok(Self {
            inner: Mutex::new(Inner {
                wal,
                state,
                events_since_checkpoint: 0,
            }),
            checkpointer: Checkpointer::new(snapshot_path.clone()),
            snapshot_path,
            id_gen,
        })
    }

    /// Append an event, apply it to the in-memory state, and flush.
    /// Checkpoints and truncates the WAL every [`CHECKPOINT_EVERY_N_EVENTS`].
    fn commit(&self, inner: &mut Inner, event: JobEvent) -> Result<(), StoreError> {
        let seq = inner.wal.append(&event)?;
        inner.wal.flush()?;
        inner.state.apply_event(&event);
        inner.wal.mark_processed(seq);
        inner.events_since_checkpoint += 1;

        if inner.events_since_checkpoint >= CHECKPOINT_EVERY_N_EVENTS {
            let handle = self.checkpointer.start(seq, &inner.state);
            let result = handle.wait()?;
            inner.wal.truncate_before(result.seq)?;
            inner.events_since_checkpoint = 0;
        }

        Ok(())
    }

    pub fn create_job(&self, config: JobConfig) -> Result<Job, StoreError> {
        let mut inner = self.inner.lock();
        let job = Job::new(JobId::from(self.id_gen.next()), config, epoch_ms_now());
        self.commit(&mut inner, JobEvent::JobCreated { job: job.clone() })?;
        Ok(job)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update_status(
        &self,
        id: &JobId,
        status: JobStatus,
        pid: Option<u32>,
        run_number: Option<u32>,
        output_dir: Option<PathBuf>,
        exit_code: Option<i32>,
        error_message: Option<String>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let current = inner
            .state
            .get_job(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?
            .status;
        JobStatus::validate_transition(current, status)?;

        let now = epoch_ms_now();
        let started_at_ms = if status == JobStatus::Running {
            Some(now)
        } else {
            None
        };
        let completed_at_ms = if status.is_terminal() { Some(now) } else { None };

        self.commit(
            &mut inner,
            JobEvent::JobStatusChanged {
                id: id.clone(),
                status,
                pid,
                run_number,
                output_dir,
                started_at_ms,
                completed_at_ms,
                exit_code,
                error_message,
            },
        )
    }

    pub fn update_progress(
        &self,
        id: &JobId,
        percent: u8,
        step: impl Into<String>,
        preview_line: Option<String>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.state.get_job(id.as_str()).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.commit(
            &mut inner,
            JobEvent::JobProgressUpdated {
                id: id.clone(),
                percent,
                step: step.into(),
                preview_line,
            },
        )
    }

    /// Looks up a job by id or unique prefix. A tombstoned row (`deleted`,
    /// spec §8 invariant 4) is invisible here even though it still lives in
    /// [`MaterializedState`] — deletion is an explicit `H` operation, not a
    /// state the rest of the service should ever observe again.
    pub fn get(&self, id_or_prefix: &str) -> Option<Job> {
        self.inner
            .lock()
            .state
            .get_job(id_or_prefix)
            .filter(|j| !j.deleted)
            .cloned()
    }

    pub fn list(&self) -> Vec<Job> {
        self.inner
            .lock()
            .state
            .list_jobs()
            .into_iter()
            .filter(|j| !j.deleted)
            .cloned()
            .collect()
    }

    pub fn delete(&self, id: &JobId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.state.get_job(id.as_str()).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.commit(&mut inner, JobEvent::JobDeleted { id: id.clone() })
    }

    /// Register a known asset from the static catalog. Idempotent: calling
    /// this repeatedly for the same key at every startup only updates the
    /// catalog-derived fields, never `installed`/`size_bytes`.
    pub fn register_asset(
        &self,
        key: megarg_core::AssetKey,
        display_name: impl Into<String>,
        install_path: PathBuf,
        required: bool,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        self.commit(
            &mut inner,
            JobEvent::AssetStateChanged {
                key,
                display_name: Some(display_name.into()),
                install_path: Some(install_path),
                required: Some(required),
                download_state: None,
                download_progress_percent: None,
                last_error: None,
            },
        )
    }

    pub fn update_asset_download_state(
        &self,
        key: &megarg_core::AssetKey,
        download_state: megarg_core::DownloadState,
        download_progress_percent: Option<u8>,
        last_error: Option<String>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        self.commit(
            &mut inner,
            JobEvent::AssetStateChanged {
                key: key.clone(),
                display_name: None,
                install_path: None,
                required: None,
                download_state: Some(download_state),
                download_progress_percent,
                last_error,
            },
        )
    }

    pub fn get_asset(&self, key: &str) -> Option<megarg_core::DatabaseAsset> {
        self.inner.lock().state.get_asset(key).cloned()
    }

    pub fn list_assets(&self) -> Vec<megarg_core::DatabaseAsset> {
        self.inner
            .lock()
            .state
            .list_assets()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Record the result of a filesystem probe for an asset's installed
    /// state. Deliberately not event-sourced: re-derived on every probe, so
    /// there is nothing durable to replay.
    pub fn set_asset_probe(&self, key: &str, installed: bool, size_bytes: u64) {
        self.inner
            .lock()
            .state
            .set_asset_probe(key, installed, size_bytes);
    }

    /// Crash-recovery reconciliation: any job left `RUNNING` whose `pid` is
    /// no longer alive is forced to `FAILED` with a fixed error message.
    /// Called once at daemon startup, before the HTTP surface is exposed.
    pub fn reconcile_on_startup(
        &self,
        is_pid_alive: impl Fn(u32) -> bool,
    ) -> Result<Vec<JobId>, StoreError> {
        let stale: Vec<(JobId, Option<u32>)> = {
            let inner = self.inner.lock();
            inner
                .state
                .list_jobs()
                .into_iter()
                .filter(|j| j.status == JobStatus::Running)
                .filter(|j| !j.pid.map(&is_pid_alive).unwrap_or(false))
                .map(|j| (j.id.clone(), j.pid))
                .collect()
        };

        let mut reconciled = Vec::with_capacity(stale.len());
        for (id, pid) in stale {
            let mut inner = self.inner.lock();
            self.commit(
                &mut inner,
                JobEvent::JobStatusChanged {
                    id: id.clone(),
                    status: JobStatus::Failed,
                    pid,
                    run_number: None,
                    output_dir: None,
                    started_at_ms: None,
                    completed_at_ms: Some(epoch_ms_now()),
                    exit_code: None,
                    error_message: Some("supervisor restarted; process lost".to_string()),
                },
            )?;
            reconciled.push(id);
        }
        Ok(reconciled)
    }

    /// Force a synchronous checkpoint and WAL truncation (daemon shutdown).
    pub fn checkpoint_sync(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.wal.flush()?;
        let seq = inner.wal.write_seq();
        let result = self.checkpointer.checkpoint_sync(seq, &inner.state)?;
        inner.wal.truncate_before(result.seq)?;
        inner.events_since_checkpoint = 0;
        Ok(())
    }

    /// Snapshot path, exposed for diagnostics/tests.
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
