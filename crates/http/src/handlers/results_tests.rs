// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::test_support::{send, test_state, wait_for_terminal};

#[tokio::test]
async fn results_for_a_failed_job_is_409_not_completed() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let script = "#!/bin/sh\nexit 1\n";
    let state = test_state(&tmp, script, 1);
    let store = state.store.clone();
    let router = crate::build_router(state);

    let (_, launch_body) = send(
        router.clone(),
        Method::POST,
        "/api/launch",
        Some(json!({"sample_id": "SRR7777777"})),
    )
    .await;
    let job_id = launch_body["job_id"].as_str().expect("job_id").to_string();
    wait_for_terminal(&store, &job_id).await;

    let (status, body) = send(router, Method::GET, &format!("/api/results/{job_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "not_completed");
}

#[tokio::test]
async fn results_for_unknown_job_is_404() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let state = test_state(&tmp, "#!/bin/sh\nexit 0\n", 1);
    let router = crate::build_router(state);

    let (status, _) = send(router, Method::GET, "/api/results/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn results_surfaces_parse_warnings_for_malformed_but_present_files() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let script = r#"#!/bin/sh
out_dir=$(ls -d "$(dirname "$0")"/outputs/"$1"_* | sort -t_ -k2 -n | tail -1)
echo 'not valid json' > "$out_dir/METADATA.json"
exit 0
"#;
    let state = test_state(&tmp, script, 1);
    let store = state.store.clone();
    let router = crate::build_router(state);

    let (_, launch_body) = send(
        router.clone(),
        Method::POST,
        "/api/launch",
        Some(json!({"sample_id": "SRR8888888"})),
    )
    .await;
    let job_id = launch_body["job_id"].as_str().expect("job_id").to_string();
    wait_for_terminal(&store, &job_id).await;

    let (status, body) = send(router, Method::GET, &format!("/api/results/{job_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["metadata"].is_null());
    let warnings = body["parse_warnings"].as_array().expect("warnings array");
    assert!(warnings.iter().any(|w| w["file"] == "METADATA.json"));
    assert!(body["completed_at"].as_u64().is_some());
}
