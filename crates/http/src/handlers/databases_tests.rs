// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::{Method, StatusCode};

use crate::test_support::{send, test_state};

#[tokio::test]
async fn list_returns_the_full_catalog_uninstalled() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let state = test_state(&tmp, "#!/bin/sh\nexit 0\n", 1);
    let router = crate::build_router(state);

    let (status, body) = send(router, Method::GET, "/api/databases", None).await;
    assert_eq!(status, StatusCode::OK);
    let assets = body.as_array().expect("assets array");
    assert_eq!(assets.len(), megarg_assets::CATALOG.len());
    assert!(assets.iter().all(|a| a["installed"] == false));
}

#[tokio::test]
async fn update_unknown_key_is_404() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let state = test_state(&tmp, "#!/bin/sh\nexit 0\n", 1);
    let router = crate::build_router(state);

    let (status, _) = send(
        router,
        Method::POST,
        "/api/databases/not-a-real-key/update",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn second_concurrent_update_for_the_same_key_is_409() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let state = test_state(&tmp, "#!/bin/sh\nexit 0\n", 1);
    let router = crate::build_router(state);

    let (status, _) = send(router.clone(), Method::POST, "/api/databases/card/update", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(router, Method::POST, "/api/databases/card/update", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "already_downloading");
}

#[tokio::test]
async fn progress_reflects_the_downloading_state() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let state = test_state(&tmp, "#!/bin/sh\nexit 0\n", 1);
    let router = crate::build_router(state);

    send(router.clone(), Method::POST, "/api/databases/resfinder/update", None).await;

    let (status, body) = send(
        router,
        Method::GET,
        "/api/databases/resfinder/progress",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "downloading");
}

#[tokio::test]
async fn progress_for_unknown_key_is_404() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let state = test_state(&tmp, "#!/bin/sh\nexit 0\n", 1);
    let router = crate::build_router(state);

    let (status, _) = send(
        router,
        Method::GET,
        "/api/databases/not-a-real-key/progress",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
