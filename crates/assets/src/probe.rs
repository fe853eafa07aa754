// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem probing for an asset's installed state and on-disk size
//! (spec §4.G `list()`). Never trusts a prior write — re-derived on every
//! call, matching the teacher's `oj-engine::workspace` directory-probing
//! helpers generalized from "is this a git worktree" to "does this bundle
//! look installed."

use crate::catalog::INSTALLED_MARKER;
use std::path::Path;

/// Whether `install_path` contains the completion marker. Partial data on
/// disk with no marker probes as `installed = false` (spec §4.G: "partial
/// data on disk that does not yield an `installed=true` probe is treated as
/// absent").
pub fn is_installed(install_path: &Path) -> bool {
    install_path.join(INSTALLED_MARKER).is_file()
}

/// Recursively sum file sizes under `install_path`. `0` if the directory
/// doesn't exist yet.
pub fn directory_size(install_path: &Path) -> u64 {
    fn walk(dir: &Path) -> u64 {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return 0;
        };
        let mut total = 0;
        for entry in entries.filter_map(|e| e.ok()) {
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if metadata.is_dir() {
                total += walk(&entry.path());
            } else {
                total += metadata.len();
            }
        }
        total
    }
    walk(install_path)
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
