// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared service handles injected into every handler (spec §4.H): a single
//! `AppState` built once at startup, threaded through axum's `State`
//! extractor, and cloned cheaply (every field is an `Arc`) per request.

use std::sync::Arc;

use megarg_assets::AssetManager;
use megarg_storage::JobStore;
use megarg_supervisor::Supervisor;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JobStore>,
    pub supervisor: Arc<Supervisor>,
    pub assets: Arc<AssetManager>,
    pub config: Arc<Config>,
}
