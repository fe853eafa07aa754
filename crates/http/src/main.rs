// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `megargd` — the job-orchestration daemon. Loads configuration, opens the
//! durable store, reconciles orphaned `RUNNING` rows left by a previous
//! crash (spec §4.A `reconcile_on_startup`), then serves the HTTP surface
//! until a termination signal asks it to drain and exit (spec §5).

use std::path::PathBuf;
use std::sync::Arc;

use megarg_assets::AssetManager;
use megarg_core::SystemClock;
use megarg_http::config::Config;
use megarg_http::state::AppState;
use megarg_storage::JobStore;
use megarg_supervisor::{RunNumberAllocator, Supervisor, SupervisorConfig};
use tokio::net::TcpListener;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,megarg_http=debug".into()),
        )
        .init();

    let config_path = std::env::var("MEGARG_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./config.toml"));
    let config = Config::load(&config_path).unwrap_or_else(|e| {
        eprintln!("failed to load configuration from {}: {e}", config_path.display());
        std::process::exit(1);
    });

    std::fs::create_dir_all(&config.outputs_root)?;
    std::fs::create_dir_all(&config.assets_root)?;
    let store_dir = config.outputs_root.join(".megarg-store");

    let store = Arc::new(JobStore::open(&store_dir)?);

    // Crash recovery (spec §4.A, §8 invariant 5): any row left RUNNING by a
    // prior crash whose pid is no longer alive of this service is forced to
    // FAILED before the HTTP surface accepts any request.
    let reconciled = store.reconcile_on_startup(is_pid_alive)?;
    if !reconciled.is_empty() {
        warn!(count = reconciled.len(), "reconciled orphaned RUNNING jobs to FAILED");
    }

    let allocator = Arc::new(RunNumberAllocator::new(config.outputs_root.clone()));
    let supervisor = Arc::new(Supervisor::new(
        Arc::clone(&store),
        allocator,
        Arc::new(SystemClock),
        SupervisorConfig {
            script_path: config.script_path.clone(),
            max_concurrent_jobs: config.max_concurrent_jobs,
            stop_grace_period: config.stop_grace_period,
        },
    ));
    let assets = Arc::new(AssetManager::new(
        Arc::clone(&store),
        config.assets_root.clone(),
        config.max_concurrent_downloads,
    )?);

    let shutdown_drain = config.shutdown_drain;
    let state = AppState {
        store: Arc::clone(&store),
        supervisor: Arc::clone(&supervisor),
        assets,
        config: Arc::new(config.clone()),
    };

    let app = megarg_http::build_router(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), "megargd listening");

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let serve_result = axum::serve(listener, app).with_graceful_shutdown(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM, draining"),
            _ = sigint.recv() => info!("received SIGINT, draining"),
        }
    });

    if let Err(e) = serve_result.await {
        error!(error = %e, "server error");
    }

    supervisor.shutdown(shutdown_drain).await;
    if let Err(e) = store.checkpoint_sync() {
        error!(error = %e, "failed to checkpoint store on shutdown");
    }
    info!("megargd stopped");
    Ok(())
}

/// Probe whether `pid` is a live process of this machine, via a signal-0
/// `kill` (spec §4.A `reconcile_on_startup`: "no longer a live process of
/// this service").
fn is_pid_alive(pid: u32) -> bool {
    nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid as i32), None).is_ok()
}
