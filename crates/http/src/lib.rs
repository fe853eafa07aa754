// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin HTTP/REST surface (component H) over the job supervisor, the
//! persistence layer, the output parser, and the database-asset manager.
//! No business logic lives here — every handler only translates a request
//! into a call on A–G and maps the result to a DTO or an [`error::ApiError`]
//! (spec §4.H, §6).

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

#[cfg(test)]
mod test_support;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the full axum router, mirroring the wire forms in spec §6 exactly:
/// every route is rooted at `/api`.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/launch", post(handlers::jobs::launch))
        .route("/status/:job_id", get(handlers::jobs::status))
        .route("/results/:job_id", get(handlers::results::results))
        .route("/jobs", get(handlers::jobs::list))
        .route("/jobs/:job_id/stop", post(handlers::jobs::stop))
        .route("/jobs/:job_id", delete(handlers::jobs::delete))
        .route("/jobs/:job_id/files", get(handlers::jobs::files))
        .route("/databases", get(handlers::databases::list))
        .route("/databases/:key/update", post(handlers::databases::update))
        .route("/databases/:key/progress", get(handlers::databases::progress));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
