// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job supervisor (component D), run-number allocator (component B), and
//! progress tracker (component E): everything that owns or watches a
//! pipeline child process.

#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

mod allocator;
mod error;
mod supervisor;
mod tracker;

pub use allocator::RunNumberAllocator;
pub use error::SupervisorError;
pub use supervisor::{Supervisor, SupervisorConfig};
pub use tracker::{JobProgressState, ProgressTracker, PHASE_INITIALIZING};
