// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use megarg_core::InputType;
use tempfile::tempdir;

fn test_config() -> JobConfig {
    JobConfig {
        sample_id: "SRR28083254".to_string(),
        input_type: InputType::ReadsArchive,
        options: megarg_core::JobOptions::default(),
    }
}

#[test]
fn create_then_get_round_trips() {
    let dir = tempdir().expect("tempdir");
    let store = JobStore::open(dir.path()).expect("open");

    let job = store.create_job(test_config()).expect("create");
    let fetched = store.get(job.id.as_str()).expect("should exist");
    assert_eq!(fetched.sample_id, "SRR28083254");
    assert_eq!(fetched.status, JobStatus::Pending);
}

#[test]
fn valid_transition_succeeds() {
    let dir = tempdir().expect("tempdir");
    let store = JobStore::open(dir.path()).expect("open");
    let job = store.create_job(test_config()).expect("create");

    store
        .update_status(&job.id, JobStatus::Running, Some(1234), Some(1), None, None, None)
        .expect("pending -> running");

    let fetched = store.get(job.id.as_str()).expect("exists");
    assert_eq!(fetched.status, JobStatus::Running);
    assert_eq!(fetched.pid, Some(1234));
}

#[test]
fn invalid_transition_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let store = JobStore::open(dir.path()).expect("open");
    let job = store.create_job(test_config()).expect("create");

    let err = store
        .update_status(&job.id, JobStatus::Completed, None, None, None, None, None)
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(CoreError::InvalidTransition { .. })
    ));
}

#[test]
fn terminal_status_cannot_transition_again() {
    let dir = tempdir().expect("tempdir");
    let store = JobStore::open(dir.path()).expect("open");
    let job = store.create_job(test_config()).expect("create");

    store
        .update_status(&job.id, JobStatus::Running, Some(1), None, None, None, None)
        .expect("pending -> running");
    store
        .update_status(
            &job.id,
            JobStatus::Completed,
            None,
            None,
            None,
            Some(0),
            None,
        )
        .expect("running -> completed");

    let err = store
        .update_status(&job.id, JobStatus::Failed, None, None, None, None, None)
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(CoreError::InvalidTransition { .. })
    ));
}

#[test]
fn progress_update_on_unknown_job_is_not_found() {
    let dir = tempdir().expect("tempdir");
    let store = JobStore::open(dir.path()).expect("open");

    let err = store
        .update_progress(&JobId::from("nope".to_string()), 10, "assembly", None)
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn delete_removes_job() {
    let dir = tempdir().expect("tempdir");
    let store = JobStore::open(dir.path()).expect("open");
    let job = store.create_job(test_config()).expect("create");

    store.delete(&job.id).expect("delete");
    assert!(store.get(job.id.as_str()).is_none());
}

#[test]
fn reconcile_fails_running_jobs_with_dead_pid() {
    let dir = tempdir().expect("tempdir");
    let store = JobStore::open(dir.path()).expect("open");
    let job = store.create_job(test_config()).expect("create");
    store
        .update_status(&job.id, JobStatus::Running, Some(99999), Some(1), None, None, None)
        .expect("pending -> running");

    let reconciled = store.reconcile_on_startup(|_pid| false).expect("reconcile");
    assert_eq!(reconciled, vec![job.id.clone()]);

    let fetched = store.get(job.id.as_str()).expect("exists");
    assert_eq!(fetched.status, JobStatus::Failed);
}

#[test]
fn reconcile_leaves_alive_jobs_running() {
    let dir = tempdir().expect("tempdir");
    let store = JobStore::open(dir.path()).expect("open");
    let job = store.create_job(test_config()).expect("create");
    store
        .update_status(&job.id, JobStatus::Running, Some(1), Some(1), None, None, None)
        .expect("pending -> running");

    let reconciled = store.reconcile_on_startup(|_pid| true).expect("reconcile");
    assert!(reconciled.is_empty());
    assert_eq!(store.get(job.id.as_str()).unwrap().status, JobStatus::Running);
}

#[test]
fn reopen_after_checkpoint_replays_state() {
    let dir = tempdir().expect("tempdir");
    let job_id;
    {
        let store = JobStore::open(dir.path()).expect("open");
        let job = store.create_job(test_config()).expect("create");
        job_id = job.id.clone();
        store.checkpoint_sync().expect("checkpoint");
    }

    let reopened = JobStore::open(dir.path()).expect("reopen");
    assert!(reopened.get(job_id.as_str()).is_some());
}

#[test]
fn asset_registration_and_download_progress() {
    use megarg_core::{AssetKey, DownloadState};

    let dir = tempdir().expect("tempdir");
    let store = JobStore::open(dir.path()).expect("open");
    let key = AssetKey::from("card".to_string());

    store
        .register_asset(key.clone(), "CARD", "/opt/db/card".into(), true)
        .expect("register");
    store
        .update_asset_download_state(&key, DownloadState::Downloading, Some(55), None)
        .expect("progress");

    let asset = store.get_asset("card").expect("exists");
    assert_eq!(asset.download_state, DownloadState::Downloading);
    assert_eq!(asset.download_progress_percent, 55);

    store.set_asset_probe("card", true, 4_096);
    let asset = store.get_asset("card").expect("exists");
    assert!(asset.installed);
    assert_eq!(asset.size_bytes, 4_096);
}
