// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared by the domain types in this crate.
//!
//! Downstream crates (storage, supervisor, parser, assets, http) define their
//! own `thiserror` enums and wrap or convert into these where a domain rule
//! is violated, per the error taxonomy in spec §7.

use crate::job::JobStatus;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },

    #[error("job is already in a terminal state")]
    AlreadyTerminal,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
