// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /results/{job_id}` (spec §4.H, §4.F): parse a completed job's run
//! directory on demand and serialise the result record.

use axum::extract::{Path, State};
use axum::Json;
use megarg_core::JobStatus;

use crate::error::ApiError;
use crate::handlers::dto::ResultsResponse;
use crate::state::AppState;

pub async fn results(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<ResultsResponse>, ApiError> {
    let job = state
        .store
        .get(&job_id)
        .ok_or_else(|| ApiError::NotFound(job_id.clone()))?;

    if job.status != JobStatus::Completed {
        return Err(ApiError::NotCompleted);
    }

    let output_dir = job
        .output_dir
        .as_ref()
        .ok_or_else(|| ApiError::internal("completed job has no output_dir"))?;

    let parsed = megarg_parser::parse(output_dir, &job.sample_id);
    Ok(Json(ResultsResponse::new(parsed, job.completed_at_ms)))
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
