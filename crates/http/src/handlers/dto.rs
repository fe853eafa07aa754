// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-format response bodies (spec §6 HTTP table). Kept separate from
//! the domain `Job`/`DatabaseAsset` types so storage-internal field names
//! (`*_ms`) never leak into the API surface.

use megarg_core::{DatabaseAsset, Job};
use megarg_parser::ParsedResults;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LaunchResponse {
    pub job_id: String,
    pub sample_id: String,
    pub status: String,
    pub created_at: u64,
}

impl From<&Job> for LaunchResponse {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id.to_string(),
            sample_id: job.sample_id.clone(),
            status: job.status.to_string(),
            created_at: job.created_at_ms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub job_id: String,
    pub sample_id: String,
    pub status: String,
    pub run_number: Option<u32>,
    pub progress_percent: u8,
    pub current_step: String,
    pub logs_preview: Vec<String>,
    pub started_at: Option<u64>,
    pub completed_at: Option<u64>,
    pub exit_code: Option<i32>,
    pub error_message: Option<String>,
}

impl From<&Job> for StatusResponse {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id.to_string(),
            sample_id: job.sample_id.clone(),
            status: job.status.to_string(),
            run_number: job.run_number,
            progress_percent: job.progress_percent,
            current_step: job.current_step.clone(),
            logs_preview: job.logs_preview.as_slice_vec(),
            started_at: job.started_at_ms,
            completed_at: job.completed_at_ms,
            exit_code: job.exit_code,
            error_message: job.error_message.clone(),
        }
    }
}

/// `GET /results/{job_id}` body (spec §6): the parser's [`ParsedResults`]
/// flattened alongside `completed_at`, which lives on the job record, not
/// the parsed file tree — the parser has no timestamp of its own (spec §8
/// property 8: parsing the same directory twice is byte-identical).
#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    #[serde(flatten)]
    pub results: ParsedResults,
    pub completed_at: Option<u64>,
}

impl ResultsResponse {
    pub fn new(results: ParsedResults, completed_at: Option<u64>) -> Self {
        Self { results, completed_at }
    }
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub total: usize,
    pub jobs: Vec<StatusResponse>,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub ack: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { ack: true }
    }
}

#[derive(Debug, Serialize)]
pub struct AssetResponse {
    pub key: String,
    pub display_name: String,
    pub installed: bool,
    pub required: bool,
    pub size_bytes: u64,
    pub download_state: String,
    pub download_progress_percent: u8,
    pub last_error: Option<String>,
}

impl From<&DatabaseAsset> for AssetResponse {
    fn from(asset: &DatabaseAsset) -> Self {
        Self {
            key: asset.key.to_string(),
            display_name: asset.display_name.clone(),
            installed: asset.installed,
            required: asset.required,
            size_bytes: asset.size_bytes,
            download_state: asset.download_state.to_string(),
            download_progress_percent: asset.download_progress_percent,
            last_error: asset.last_error.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub state: String,
    pub percent: u8,
    pub last_message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FileEntry {
    pub rel_path: String,
    pub size: u64,
    pub mime: String,
}
