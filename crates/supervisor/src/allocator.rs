// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-number allocator (component B): collision-free directory naming for
//! repeated submissions of the same sample.

use parking_lot::Mutex;
use regex::Regex;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Allocates run numbers under a shared outputs root, serialized per
/// `sample_id` by a lock table. A synchronous `read_dir` + `mkdir`, never an
/// async lock — the critical section never crosses an await point.
pub struct RunNumberAllocator {
    outputs_root: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RunNumberAllocator {
    pub fn new(outputs_root: PathBuf) -> Self {
        Self {
            outputs_root,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, sample_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry(sample_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Allocate the next run number for `sample_id` and materialize its
    /// output directory before releasing the per-sample lock. Agreement with
    /// the external script's own allocator requires the "pure digits only"
    /// rule below: a free-form legacy suffix like `SRR1_old` is ignored, not
    /// counted toward the maximum.
    pub fn next_run_number(&self, sample_id: &str) -> io::Result<(u32, PathBuf)> {
        let sample_lock = self.lock_for(sample_id);
        let _guard = sample_lock.lock();

        let pattern = Regex::new(&format!("^{}_(\\d+)$", regex::escape(sample_id)))
            .expect("constructed from an escaped literal, always valid");

        let max_existing = match std::fs::read_dir(&self.outputs_root) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .filter_map(|e| e.file_name().into_string().ok())
                .filter_map(|name| {
                    pattern
                        .captures(&name)
                        .and_then(|c| c.get(1))
                        .and_then(|m| m.as_str().parse::<u32>().ok())
                })
                .max()
                .unwrap_or(0),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e),
        };

        let next = max_existing + 1;
        let dir = self.outputs_root.join(format!("{sample_id}_{next}"));
        std::fs::create_dir_all(&dir)?;
        Ok((next, dir))
    }
}

#[cfg(test)]
#[path = "allocator_tests.rs"]
mod tests;
