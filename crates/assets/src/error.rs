// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the database-asset manager (component G).

use megarg_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("unknown asset key: {0}")]
    NotFound(String),

    #[error("asset is already downloading")]
    AlreadyDownloading,

    #[error(transparent)]
    Store(#[from] StoreError),
}
