// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for handler-level tests: build a full [`AppState`] over a
//! temp-directory store/outputs/assets tree and a throwaway shell-script
//! "pipeline", the same way `megarg_supervisor::supervisor_tests` does for
//! the supervisor alone.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use megarg_assets::AssetManager;
use megarg_core::SystemClock;
use megarg_storage::JobStore;
use megarg_supervisor::{RunNumberAllocator, Supervisor, SupervisorConfig};

use crate::config::Config;
use crate::state::AppState;

pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("write script");
    let mut perms = std::fs::metadata(&path).expect("metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod");
    path
}

/// Build an [`AppState`] rooted at `tmp`, with the pipeline script replaced
/// by `script_body` and `max_concurrent_jobs` jobs admitted at once.
pub fn test_state(
    tmp: &tempfile::TempDir,
    script_body: &str,
    max_concurrent_jobs: usize,
) -> AppState {
    let store_dir = tmp.path().join("store");
    let outputs_root = tmp.path().join("outputs");
    let assets_root = tmp.path().join("assets");
    std::fs::create_dir_all(&outputs_root).expect("mkdir outputs");
    let script_path = write_script(tmp.path(), "pipeline.sh", script_body);

    let store = Arc::new(JobStore::open(&store_dir).expect("open store"));
    let allocator = Arc::new(RunNumberAllocator::new(outputs_root.clone()));
    let supervisor = Arc::new(Supervisor::new(
        Arc::clone(&store),
        allocator,
        Arc::new(SystemClock),
        SupervisorConfig {
            script_path: script_path.clone(),
            max_concurrent_jobs,
            stop_grace_period: Duration::from_secs(1),
        },
    ));
    let assets = Arc::new(AssetManager::new(Arc::clone(&store), assets_root.clone(), 2).expect("new manager"));

    let config = Arc::new(Config {
        api_host: "127.0.0.1".to_string(),
        api_port: 0,
        outputs_root,
        assets_root,
        script_path,
        max_concurrent_jobs,
        max_concurrent_downloads: 2,
        stop_grace_period: Duration::from_secs(1),
        shutdown_drain: Duration::from_secs(1),
        default_threads: 8,
    });

    AppState {
        store,
        supervisor,
        assets,
        config,
    }
}

/// Poll the store until `job_id` reaches a terminal status or the deadline
/// elapses.
pub async fn wait_for_terminal(store: &JobStore, job_id: &str) -> megarg_core::Job {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let job = store.get(job_id).expect("job exists");
        if job.status.is_terminal() {
            return job;
        }
        if tokio::time::Instant::now() >= deadline {
            panic!(
                "job {job_id} did not reach a terminal state in time (status={:?})",
                job.status
            );
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Drive `router` with a single request, returning the status and the
/// parsed JSON body (`Value::Null` for an empty body, e.g. a 204).
pub async fn send(
    router: axum::Router,
    method: axum::http::Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (axum::http::StatusCode, serde_json::Value) {
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    let request_body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            axum::body::Body::from(serde_json::to_vec(&value).expect("serialize body"))
        }
        None => axum::body::Body::empty(),
    };
    let request = builder.body(request_body).expect("build request");

    let response = router.oneshot(request).await.expect("request completes");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("valid json body")
    };
    (status, value)
}
