// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Database-asset manager (component G): enumerates known reference-data
//! bundles, probes their installed state, and runs background downloads
//! capped at `max_concurrent_downloads` concurrent transfers.

use crate::catalog::{self, CATALOG};
use crate::error::AssetError;
use crate::probe;
use futures_util::StreamExt;
use megarg_core::{AssetKey, DatabaseAsset, DownloadState};
use megarg_storage::JobStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

#[derive(Debug, Clone)]
pub struct ProgressView {
    pub state: DownloadState,
    pub percent: u8,
    pub last_message: Option<String>,
}

/// Tracks reference-data bundles (component G). One instance per daemon
/// process, shared with the HTTP surface.
pub struct AssetManager {
    store: Arc<JobStore>,
    assets_root: PathBuf,
    download_semaphore: Arc<Semaphore>,
    client: reqwest::Client,
}

impl AssetManager {
    /// Build a manager and register the static catalog into the store.
    /// Registration is idempotent: re-running it at every startup only
    /// refreshes catalog-derived fields, never `installed`/`size_bytes`
    /// (those are always probed fresh, never trusted from the store).
    pub fn new(
        store: Arc<JobStore>,
        assets_root: PathBuf,
        max_concurrent_downloads: usize,
    ) -> Result<Self, AssetError> {
        for entry in CATALOG {
            store.register_asset(
                AssetKey::new(entry.key),
                entry.display_name,
                catalog::install_path(&assets_root, entry.key),
                entry.required,
            )?;
        }
        Ok(Self {
            store,
            assets_root,
            download_semaphore: Arc::new(Semaphore::new(max_concurrent_downloads.max(1))),
            client: reqwest::Client::new(),
        })
    }

    /// Enumerate every known asset with a fresh filesystem probe (spec
    /// §4.G `list()`).
    pub fn list(&self) -> Vec<DatabaseAsset> {
        CATALOG
            .iter()
            .map(|entry| {
                let install_path = catalog::install_path(&self.assets_root, entry.key);
                let installed = probe::is_installed(&install_path);
                let size_bytes = probe::directory_size(&install_path);
                self.store.set_asset_probe(entry.key, installed, size_bytes);
                self.store
                    .get_asset(entry.key)
                    .unwrap_or_else(|| DatabaseAsset::new(
                        AssetKey::new(entry.key),
                        entry.display_name,
                        install_path,
                        entry.required,
                    ))
            })
            .collect()
    }

    pub fn progress(&self, key: &str) -> Result<ProgressView, AssetError> {
        let asset = self
            .store
            .get_asset(key)
            .ok_or_else(|| AssetError::NotFound(key.to_string()))?;
        Ok(ProgressView {
            state: asset.download_state,
            percent: asset.download_progress_percent,
            last_message: asset.last_error,
        })
    }

    /// Start a background download for `key` (spec §4.G `update()`). At
    /// most one concurrent download per key; the actual network fetch
    /// queues behind `max_concurrent_downloads` before it starts, but the
    /// key is marked `downloading` immediately so a second `update` call
    /// for the same key observes `already_downloading` right away.
    pub fn update(&self, key: &str) -> Result<(), AssetError> {
        let entry = CATALOG
            .iter()
            .find(|e| e.key == key)
            .ok_or_else(|| AssetError::NotFound(key.to_string()))?;
        let asset = self
            .store
            .get_asset(key)
            .ok_or_else(|| AssetError::NotFound(key.to_string()))?;
        if asset.download_state == DownloadState::Downloading {
            return Err(AssetError::AlreadyDownloading);
        }

        self.store
            .update_asset_download_state(&AssetKey::new(key), DownloadState::Downloading, Some(0), None)?;

        let store = Arc::clone(&self.store);
        let semaphore = Arc::clone(&self.download_semaphore);
        let client = self.client.clone();
        let install_path = catalog::install_path(&self.assets_root, key);
        let download_url = entry.download_url.to_string();
        let key = key.to_string();

        tokio::spawn(async move {
            let _permit = semaphore.acquire().await;
            match run_download(&client, &download_url, &install_path, &store, &key).await {
                Ok(()) => {
                    let _ = store.update_asset_download_state(
                        &AssetKey::new(key.as_str()),
                        DownloadState::Idle,
                        None,
                        None,
                    );
                }
                Err(message) => {
                    tracing::warn!(asset = %key, error = %message, "asset download failed");
                    let _ = store.update_asset_download_state(
                        &AssetKey::new(key.as_str()),
                        DownloadState::Error,
                        None,
                        Some(message),
                    );
                }
            }
        });

        Ok(())
    }
}

/// Stream the bundle to `install_path/.download.tmp`, reporting progress
/// along the way, then drop the completion marker. A partial temp file
/// from a failed attempt has no marker, so the next `update()` simply
/// overwrites it (spec §4.G: "resumable-or-restartable").
async fn run_download(
    client: &reqwest::Client,
    url: &str,
    install_path: &std::path::Path,
    store: &JobStore,
    key: &str,
) -> Result<(), String> {
    tokio::fs::create_dir_all(install_path)
        .await
        .map_err(|e| e.to_string())?;

    let response = client.get(url).send().await.map_err(|e| e.to_string())?;
    let response = response.error_for_status().map_err(|e| e.to_string())?;
    let total_bytes = response.content_length();

    let tmp_path = install_path.join(".download.tmp");
    let mut file = tokio::fs::File::create(&tmp_path)
        .await
        .map_err(|e| e.to_string())?;

    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();
    let mut last_reported = 0u8;

    use tokio::io::AsyncWriteExt;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| e.to_string())?;
        downloaded += chunk.len() as u64;
        file.write_all(&chunk).await.map_err(|e| e.to_string())?;

        if let Some(total) = total_bytes.filter(|t| *t > 0) {
            let percent = ((downloaded * 100) / total).min(99) as u8;
            if percent != last_reported {
                last_reported = percent;
                let _ = store.update_asset_download_state(
                    &AssetKey::new(key),
                    DownloadState::Downloading,
                    Some(percent),
                    None,
                );
            }
        }
    }
    file.flush().await.map_err(|e| e.to_string())?;
    drop(file);

    tokio::fs::remove_file(&tmp_path).await.map_err(|e| e.to_string())?;
    tokio::fs::write(install_path.join(crate::catalog::INSTALLED_MARKER), b"")
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
