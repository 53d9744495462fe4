use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub port: u16,
    pub video_dir: String,
    pub backup_path: String,
    pub entries: usize,
    pub dirty: bool,
    pub health: String,
}

/// GET /ok
///
/// Plain-text health for simple probes.
pub async fn ok(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.health().is_healthy() {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT OK")
    }
}

/// GET /api/v1/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: state.health().as_str().to_string(),
    })
}

/// GET /api/v1/status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let catalog = state.catalog();
    Json(StatusResponse {
        port: state.config().server.port,
        video_dir: state.video_dir().display().to_string(),
        backup_path: state.config().library.backup_path.display().to_string(),
        entries: catalog.len(),
        dirty: catalog.is_dirty(),
        health: state.health().as_str().to_string(),
    })
}

/// GET /metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state);
    (
        [("content-type", "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
