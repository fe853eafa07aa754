// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable persistence layer (component A): a JSONL write-ahead log with
//! group commit, periodic zstd-compressed snapshots, and the materialized
//! job/asset state derived from replaying the log.

mod checkpoint;
mod migration;
mod snapshot;
mod state;
mod store;
mod wal;

pub use checkpoint::{
    load_snapshot, CheckpointError, CheckpointHandle, CheckpointResult, CheckpointWriter,
    Checkpointer, FsCheckpointWriter,
};
pub use migration::{Migration, MigrationError, MigrationRegistry};
pub use snapshot::{Snapshot, SnapshotError};
pub use state::MaterializedState;
pub use store::{JobStore, StoreError};
pub use wal::{Wal, WalEntry, WalError};

/// Current on-disk snapshot schema version. Bump this and register a
/// [`Migration`] whenever [`MaterializedState`]'s shape changes.
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;
