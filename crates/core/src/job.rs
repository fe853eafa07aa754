// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier, status state machine, and the job record itself.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::error::CoreError;

crate::define_id! {
    /// Unique identifier for a submitted job. Stable for the lifetime of the row.
    #[derive(Default)]
    pub struct JobId;
}

/// How a submitted `sample_id` was classified (component C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    ReadsArchive,
    SequenceAccession,
    AssemblyAccession,
    LocalFile,
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InputType::ReadsArchive => "reads_archive",
            InputType::SequenceAccession => "sequence_accession",
            InputType::AssemblyAccession => "assembly_accession",
            InputType::LocalFile => "local_file",
        };
        write!(f, "{s}")
    }
}

/// Lifecycle status of a job. See the transition table in §4.A of the spec:
/// PENDING -> RUNNING -> {COMPLETED, FAILED, STOPPED}, or PENDING -> {FAILED, STOPPED}
/// directly. Terminal statuses never transition further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Stopped,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Stopped
        )
    }

    /// Validate a status transition against the table in spec §4.A.
    /// Terminal statuses never transition further; PENDING may only become
    /// RUNNING/FAILED/STOPPED; RUNNING may only become COMPLETED/FAILED/STOPPED.
    pub fn validate_transition(from: JobStatus, to: JobStatus) -> Result<(), CoreError> {
        let allowed = match from {
            JobStatus::Pending => matches!(
                to,
                JobStatus::Running | JobStatus::Failed | JobStatus::Stopped
            ),
            JobStatus::Running => matches!(
                to,
                JobStatus::Completed | JobStatus::Failed | JobStatus::Stopped
            ),
            JobStatus::Completed | JobStatus::Failed | JobStatus::Stopped => false,
        };
        if allowed {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition { from, to })
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::Stopped => "STOPPED",
        };
        write!(f, "{s}")
    }
}

/// Bounded ring of the most recent log lines surfaced on the job record
/// (spec §3 `logs_preview`; capacity matches the §4.E progress tracker buffer).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogPreview {
    lines: VecDeque<String>,
    capacity: usize,
}

pub const LOG_PREVIEW_CAPACITY: usize = 200;

impl LogPreview {
    pub fn new() -> Self {
        Self {
            lines: VecDeque::new(),
            capacity: LOG_PREVIEW_CAPACITY,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    pub fn as_slice_vec(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Configuration echoed back to the child process and stored immutably on the job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOptions {
    #[serde(default = "default_threads")]
    pub threads: u32,
    #[serde(default = "default_prokka_mode")]
    pub prokka_mode: String,
    #[serde(default)]
    pub prokka_genus: Option<String>,
    #[serde(default)]
    pub prokka_species: Option<String>,
    #[serde(default)]
    pub force: bool,
}

fn default_threads() -> u32 {
    8
}

fn default_prokka_mode() -> String {
    "auto".to_string()
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            prokka_mode: default_prokka_mode(),
            prokka_genus: None,
            prokka_species: None,
            force: false,
        }
    }
}

/// Arguments needed to create a new job row (component A `create_job`).
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub sample_id: String,
    pub input_type: InputType,
    pub options: JobOptions,
}

/// The central job entity (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub sample_id: String,
    pub input_type: InputType,
    pub status: JobStatus,

    pub run_number: Option<u32>,
    pub output_dir: Option<std::path::PathBuf>,
    pub pid: Option<u32>,

    pub threads: u32,
    pub prokka_mode: String,
    pub prokka_genus: Option<String>,
    pub prokka_species: Option<String>,
    pub force: bool,

    pub created_at_ms: u64,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,

    pub exit_code: Option<i32>,
    pub error_message: Option<String>,

    pub progress_percent: u8,
    pub current_step: String,
    #[serde(default)]
    pub logs_preview: LogPreview,

    /// Set by an explicit DELETE (spec §8 invariant 4) once `output_dir` has
    /// been best-effort removed.
    #[serde(default)]
    pub deleted: bool,
}

impl Job {
    pub fn new(id: JobId, config: JobConfig, created_at_ms: u64) -> Self {
        Self {
            id,
            sample_id: config.sample_id,
            input_type: config.input_type,
            status: JobStatus::Pending,
            run_number: None,
            output_dir: None,
            pid: None,
            threads: config.options.threads,
            prokka_mode: config.options.prokka_mode,
            prokka_genus: config.options.prokka_genus,
            prokka_species: config.options.prokka_species,
            force: config.options.force,
            created_at_ms,
            started_at_ms: None,
            completed_at_ms: None,
            exit_code: None,
            error_message: None,
            progress_percent: 0,
            current_step: "initializing".to_string(),
            logs_preview: LogPreview::new(),
            deleted: false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
