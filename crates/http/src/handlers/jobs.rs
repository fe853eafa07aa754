// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/launch`, `/status/{job_id}`, `/jobs`, `/jobs/{job_id}/stop`, and
//! `/jobs/{job_id}` (DELETE) — thin adapters (spec §4.H: "no business
//! logic") over the supervisor and the store.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use megarg_core::{JobOptions, JobStatus};

use crate::error::ApiError;
use crate::handlers::dto::{AckResponse, JobListResponse, LaunchResponse, StatusResponse};
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct LaunchRequest {
    pub sample_id: String,
    pub threads: Option<u32>,
    pub prokka_mode: Option<String>,
    pub prokka_genus: Option<String>,
    pub prokka_species: Option<String>,
    pub force: Option<bool>,
}

pub async fn launch(
    State(state): State<AppState>,
    Json(request): Json<LaunchRequest>,
) -> Result<Json<LaunchResponse>, ApiError> {
    let options = JobOptions {
        threads: request.threads.unwrap_or(state.config.default_threads),
        prokka_mode: request.prokka_mode.unwrap_or_else(|| "auto".to_string()),
        prokka_genus: request.prokka_genus,
        prokka_species: request.prokka_species,
        force: request.force.unwrap_or(false),
    };

    let job = state.supervisor.launch(request.sample_id, options).await?;
    Ok(Json(LaunchResponse::from(&job)))
}

pub async fn status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let job = state
        .store
        .get(&job_id)
        .ok_or_else(|| ApiError::NotFound(job_id.clone()))?;
    Ok(Json(StatusResponse::from(&job)))
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct ListQuery {
    pub status_filter: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<JobListResponse>, ApiError> {
    let status_filter = query
        .status_filter
        .as_deref()
        .map(parse_status_filter)
        .transpose()?;

    let mut jobs = state.store.list();
    if let Some(wanted) = status_filter {
        jobs.retain(|j| j.status == wanted);
    }
    jobs.sort_by_key(|j| j.created_at_ms);

    let total = jobs.len();
    let offset = query.offset.unwrap_or(0);
    let page: Vec<StatusResponse> = jobs
        .iter()
        .skip(offset)
        .take(query.limit.unwrap_or(total.max(1)))
        .map(StatusResponse::from)
        .collect();

    Ok(Json(JobListResponse { total, jobs: page }))
}

fn parse_status_filter(raw: &str) -> Result<JobStatus, ApiError> {
    match raw.to_ascii_uppercase().as_str() {
        "PENDING" => Ok(JobStatus::Pending),
        "RUNNING" => Ok(JobStatus::Running),
        "COMPLETED" => Ok(JobStatus::Completed),
        "FAILED" => Ok(JobStatus::Failed),
        "STOPPED" => Ok(JobStatus::Stopped),
        other => Err(ApiError::InvalidInput(format!("unknown status_filter: {other}"))),
    }
}

pub async fn stop(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<AckResponse>, ApiError> {
    state.supervisor.stop(&job_id).await?;
    Ok(Json(AckResponse::ok()))
}

/// DELETE `/jobs/{job_id}`: best-effort removes `output_dir` before the
/// deletion event is committed (spec §8 invariant 4). The row is
/// tombstoned (`Job::deleted = true`), not destroyed; `JobStore::get`/
/// `list` hide it from every other caller from this point on.
pub async fn delete(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let job = state
        .store
        .get(&job_id)
        .ok_or_else(|| ApiError::NotFound(job_id.clone()))?;

    if let Some(output_dir) = &job.output_dir {
        if let Err(e) = std::fs::remove_dir_all(output_dir) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(job_id = %job.id, error = %e, "failed to remove run directory");
            }
        }
    }

    state.store.delete(&job.id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn files(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<crate::handlers::dto::FileEntry>>, ApiError> {
    let job = state
        .store
        .get(&job_id)
        .ok_or_else(|| ApiError::NotFound(job_id.clone()))?;

    let Some(output_dir) = &job.output_dir else {
        return Ok(Json(Vec::new()));
    };

    Ok(Json(crate::handlers::files::list_files(output_dir)))
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
