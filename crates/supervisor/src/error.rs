// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the job supervisor (component D).

use megarg_core::CoreError;
use megarg_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("too many concurrent jobs")]
    TooManyJobs,

    #[error("job {0} not found")]
    NotFound(String),

    #[error("job is already in a terminal state")]
    AlreadyTerminal,

    #[error("failed to spawn child process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] CoreError),
}
