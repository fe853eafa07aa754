// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The HTTP error taxonomy (spec §7), composed from every lower crate's
//! `thiserror` enum into one `IntoResponse` type, mirroring
//! `sem_os_server::error::AppError`'s single conversion point.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use megarg_assets::AssetError;
use megarg_core::{CoreError, JobStatus};
use megarg_storage::StoreError;
use megarg_supervisor::SupervisorError;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    NotFound(String),
    InvalidTransition { from: JobStatus, to: JobStatus },
    AlreadyTerminal,
    NotCompleted,
    TooManyJobs,
    AlreadyDownloading,
    Internal { correlation_id: Uuid, message: String },
}

impl ApiError {
    /// Build an `internal_error` response, logging the failure alongside
    /// the correlation id returned to the caller (spec §7: "logged with
    /// correlation id").
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        let correlation_id = Uuid::new_v4();
        tracing::error!(%correlation_id, %message, "internal error");
        Self::Internal {
            correlation_id,
            message,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::NotFound(_) => "not_found",
            ApiError::InvalidTransition { .. } => "invalid_transition",
            ApiError::AlreadyTerminal => "already_terminal",
            ApiError::NotCompleted => "not_completed",
            ApiError::TooManyJobs => "too_many_jobs",
            ApiError::AlreadyDownloading => "already_downloading",
            ApiError::Internal { .. } => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidTransition { .. }
            | ApiError::AlreadyTerminal
            | ApiError::NotCompleted
            | ApiError::AlreadyDownloading => StatusCode::CONFLICT,
            ApiError::TooManyJobs => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::InvalidInput(s) => format!("invalid input: {s}"),
            ApiError::NotFound(s) => format!("not found: {s}"),
            ApiError::InvalidTransition { from, to } => {
                format!("invalid transition from {from} to {to}")
            }
            ApiError::AlreadyTerminal => "job is already in a terminal state".to_string(),
            ApiError::NotCompleted => "job has not reached a terminal state".to_string(),
            ApiError::TooManyJobs => "too many concurrent jobs".to_string(),
            ApiError::AlreadyDownloading => "asset is already downloading".to_string(),
            ApiError::Internal { message, .. } => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = self.message();
        let correlation_id = match &self {
            ApiError::Internal { correlation_id, .. } => Some(*correlation_id),
            _ => None,
        };

        let mut body = json!({
            "error": code,
            "message": message,
        });
        if let Some(id) = correlation_id {
            body["correlation_id"] = json!(id.to_string());
        }

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidTransition { from, to } => ApiError::InvalidTransition { from, to },
            CoreError::AlreadyTerminal => ApiError::AlreadyTerminal,
            CoreError::InvalidInput(s) => ApiError::InvalidInput(s),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ApiError::NotFound(id),
            StoreError::Domain(ce) => ce.into(),
            StoreError::Wal(_) | StoreError::Snapshot(_) | StoreError::Checkpoint(_) => {
                ApiError::internal(e.to_string())
            }
        }
    }
}

impl From<SupervisorError> for ApiError {
    fn from(e: SupervisorError) -> Self {
        match e {
            SupervisorError::InvalidInput(s) => ApiError::InvalidInput(s),
            SupervisorError::TooManyJobs => ApiError::TooManyJobs,
            SupervisorError::NotFound(id) => ApiError::NotFound(id),
            SupervisorError::AlreadyTerminal => ApiError::AlreadyTerminal,
            SupervisorError::Store(se) => se.into(),
            SupervisorError::Domain(ce) => ce.into(),
            SupervisorError::Spawn(io) => ApiError::internal(io.to_string()),
        }
    }
}

impl From<AssetError> for ApiError {
    fn from(e: AssetError) -> Self {
        match e {
            AssetError::NotFound(key) => ApiError::NotFound(key),
            AssetError::AlreadyDownloading => ApiError::AlreadyDownloading,
            AssetError::Store(se) => se.into(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
