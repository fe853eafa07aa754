// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Database-asset record (component G): reference-data bundle tracking.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

crate::define_id! {
    /// Stable key identifying a known reference-data bundle, e.g. `"card"`.
    pub struct AssetKey;
}

/// Background-download state of an asset (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DownloadState {
    #[default]
    Idle,
    Downloading,
    Error,
}

impl fmt::Display for DownloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DownloadState::Idle => "idle",
            DownloadState::Downloading => "downloading",
            DownloadState::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// A known reference-data bundle. `installed`/`size_bytes` are derived from
/// filesystem probes at read time, never trusted from a prior write
/// (spec §3: "Installed-ness is derived from filesystem probes").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseAsset {
    pub key: AssetKey,
    pub display_name: String,
    pub install_path: PathBuf,
    pub required: bool,
    pub installed: bool,
    pub size_bytes: u64,
    pub download_state: DownloadState,
    pub download_progress_percent: u8,
    pub last_error: Option<String>,
}

impl DatabaseAsset {
    pub fn new(key: AssetKey, display_name: impl Into<String>, install_path: PathBuf, required: bool) -> Self {
        Self {
            key,
            display_name: display_name.into(),
            install_path,
            required,
            installed: false,
            size_bytes: 0,
            download_state: DownloadState::Idle,
            download_progress_percent: 0,
            last_error: None,
        }
    }
}
