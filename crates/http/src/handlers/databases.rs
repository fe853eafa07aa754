// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/databases`, `/databases/{key}/update`, `/databases/{key}/progress` —
//! thin adapters over the database-asset manager (component G).

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::handlers::dto::{AckResponse, AssetResponse, ProgressResponse};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Json<Vec<AssetResponse>> {
    let assets = state.assets.list();
    Json(assets.iter().map(AssetResponse::from).collect())
}

pub async fn update(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AckResponse>, ApiError> {
    state.assets.update(&key)?;
    Ok(Json(AckResponse::ok()))
}

pub async fn progress(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let view = state.assets.progress(&key)?;
    Ok(Json(ProgressResponse {
        state: view.state.to_string(),
        percent: view.percent,
        last_message: view.last_message,
    }))
}

#[cfg(test)]
#[path = "databases_tests.rs"]
mod tests;
