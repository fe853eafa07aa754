// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use axum::body::to_bytes;
use axum::http::StatusCode;

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn invalid_input_maps_to_400() {
    let response = ApiError::InvalidInput("bad sample id".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn not_found_maps_to_404() {
    let response = ApiError::NotFound("job-1".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn already_terminal_and_not_completed_and_already_downloading_map_to_409() {
    assert_eq!(
        ApiError::AlreadyTerminal.into_response().status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        ApiError::NotCompleted.into_response().status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        ApiError::AlreadyDownloading.into_response().status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        ApiError::InvalidTransition {
            from: JobStatus::Completed,
            to: JobStatus::Running,
        }
        .into_response()
        .status(),
        StatusCode::CONFLICT
    );
}

#[tokio::test]
async fn too_many_jobs_maps_to_429() {
    let response = ApiError::TooManyJobs.into_response();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn internal_error_maps_to_500_and_carries_a_correlation_id() {
    let response = ApiError::internal("disk full").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "internal_error");
    assert!(body["correlation_id"].is_string());
}

#[test]
fn store_not_found_converts_to_api_not_found() {
    let err: ApiError = StoreError::NotFound("abc".to_string()).into();
    assert!(matches!(err, ApiError::NotFound(id) if id == "abc"));
}

#[test]
fn asset_already_downloading_converts() {
    let err: ApiError = AssetError::AlreadyDownloading.into();
    assert!(matches!(err, ApiError::AlreadyDownloading));
}
