// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use megarg_core::{AssetKey, InputType, Job, JobConfig, JobId, JobOptions, JobStatus};

fn test_job(id: &str) -> Job {
    Job::new(
        JobId::from(id.to_string()),
        JobConfig {
            sample_id: "SRR28083254".to_string(),
            input_type: InputType::ReadsArchive,
            options: JobOptions::default(),
        },
        1_000,
    )
}

#[test]
fn job_created_is_idempotent() {
    let mut state = MaterializedState::default();
    let job = test_job("job-1");
    let event = JobEvent::JobCreated { job: job.clone() };

    state.apply_event(&event);
    state.apply_event(&event);

    assert_eq!(state.jobs.len(), 1);
    assert_eq!(state.get_job("job-1").unwrap().status, JobStatus::Pending);
}

#[test]
fn status_changed_updates_fields_and_is_idempotent() {
    let mut state = MaterializedState::default();
    state.apply_event(&JobEvent::JobCreated {
        job: test_job("job-1"),
    });

    let event = JobEvent::JobStatusChanged {
        id: JobId::from("job-1".to_string()),
        status: JobStatus::Running,
        pid: Some(4242),
        run_number: Some(7),
        output_dir: Some("/data/out/7".into()),
        started_at_ms: Some(2_000),
        completed_at_ms: None,
        exit_code: None,
        error_message: None,
    };

    state.apply_event(&event);
    state.apply_event(&event);

    let job = state.get_job("job-1").unwrap();
    assert_eq!(job.status, JobStatus::Running);
    assert_eq!(job.pid, Some(4242));
    assert_eq!(job.run_number, Some(7));
    assert_eq!(job.started_at_ms, Some(2_000));
}

#[test]
fn progress_merge_never_moves_backward() {
    let mut state = MaterializedState::default();
    state.apply_event(&JobEvent::JobCreated {
        job: test_job("job-1"),
    });

    state.apply_event(&JobEvent::JobProgressUpdated {
        id: JobId::from("job-1".to_string()),
        percent: 40,
        step: "assembly".to_string(),
        preview_line: Some("[assembly] contigs: 112".to_string()),
    });
    // A stale, out-of-order update for an earlier percentage must not
    // regress the job's reported progress.
    state.apply_event(&JobEvent::JobProgressUpdated {
        id: JobId::from("job-1".to_string()),
        percent: 10,
        step: "reads_qc".to_string(),
        preview_line: None,
    });

    let job = state.get_job("job-1").unwrap();
    assert_eq!(job.progress_percent, 40);
    assert_eq!(job.current_step, "reads_qc");
    assert_eq!(job.logs_preview.as_slice_vec().len(), 1);
}

#[test]
fn deleted_job_is_tombstoned_not_removed() {
    let mut state = MaterializedState::default();
    state.apply_event(&JobEvent::JobCreated {
        job: test_job("job-1"),
    });
    state.apply_event(&JobEvent::JobDeleted {
        id: JobId::from("job-1".to_string()),
    });

    // The row survives at the state layer (spec §8 invariant 4: recorded
    // with a `deleted` flag) — `JobStore::get`/`list` are what hide it from
    // callers, not `MaterializedState`.
    let job = state.get_job("job-1").expect("tombstoned row still present");
    assert!(job.deleted);
    assert_eq!(state.jobs.len(), 1);

    // Applying the deletion again must not panic or change anything.
    state.apply_event(&JobEvent::JobDeleted {
        id: JobId::from("job-1".to_string()),
    });
    assert_eq!(state.jobs.len(), 1);
    assert!(state.get_job("job-1").expect("still present").deleted);
}

#[test]
fn get_job_resolves_unique_prefix() {
    let mut state = MaterializedState::default();
    state.apply_event(&JobEvent::JobCreated {
        job: test_job("job-abc123"),
    });

    assert!(state.get_job("job-abc").is_some());
}

#[test]
fn get_job_rejects_ambiguous_prefix() {
    let mut state = MaterializedState::default();
    state.apply_event(&JobEvent::JobCreated {
        job: test_job("job-aaa1"),
    });
    state.apply_event(&JobEvent::JobCreated {
        job: test_job("job-aaa2"),
    });

    assert!(state.get_job("job-aaa").is_none());
}

#[test]
fn asset_registration_is_idempotent() {
    let mut state = MaterializedState::default();
    let event = JobEvent::AssetStateChanged {
        key: AssetKey::from("card".to_string()),
        display_name: Some("CARD".to_string()),
        install_path: Some("/opt/db/card".into()),
        required: Some(true),
        download_state: None,
        download_progress_percent: None,
        last_error: None,
    };

    state.apply_event(&event);
    state.apply_event(&event);

    assert_eq!(state.list_assets().len(), 1);
    let asset = state.get_asset("card").unwrap();
    assert_eq!(asset.display_name, "CARD");
    assert!(asset.required);
}

#[test]
fn download_progress_resets_on_completion() {
    let mut state = MaterializedState::default();
    state.apply_event(&JobEvent::AssetStateChanged {
        key: AssetKey::from("card".to_string()),
        display_name: Some("CARD".to_string()),
        install_path: Some("/opt/db/card".into()),
        required: Some(true),
        download_state: Some(megarg_core::DownloadState::Downloading),
        download_progress_percent: Some(47),
        last_error: None,
    });
    assert_eq!(
        state.get_asset("card").unwrap().download_progress_percent,
        47
    );

    state.apply_event(&JobEvent::AssetStateChanged {
        key: AssetKey::from("card".to_string()),
        display_name: None,
        install_path: None,
        required: None,
        download_state: Some(megarg_core::DownloadState::Idle),
        download_progress_percent: None,
        last_error: None,
    });
    let asset = state.get_asset("card").unwrap();
    assert_eq!(asset.download_progress_percent, 0);
    assert!(asset.last_error.is_none());
}

#[test]
fn asset_probe_overwrites_installed_and_size_only() {
    let mut state = MaterializedState::default();
    state.apply_event(&JobEvent::AssetStateChanged {
        key: AssetKey::from("card".to_string()),
        display_name: Some("CARD".to_string()),
        install_path: Some("/opt/db/card".into()),
        required: Some(true),
        download_state: None,
        download_progress_percent: None,
        last_error: None,
    });

    state.set_asset_probe("card", true, 12_345);

    let asset = state.get_asset("card").unwrap();
    assert!(asset.installed);
    assert_eq!(asset.size_bytes, 12_345);
}
