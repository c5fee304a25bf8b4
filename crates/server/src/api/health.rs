//! Health and scheduler metrics endpoints.
//!
//! SRP: server liveness and operational metrics.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::state::AppState;

// ── Health ────────────────────────────────────────────────────────

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: i64,
    pub queue_depth: usize,
    pub jobs: usize,
}

/// Service liveness and basic gauges
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: "0.1.0",
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
        queue_depth: state.queue.len(),
        jobs: state.store.len(),
    })
}

// ── Scheduler metrics ─────────────────────────────────────────────

/// GET /scheduler/metrics — dispatcher counters and queue depth.
pub async fn scheduler_metrics(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(state.metrics.snapshot(state.queue.len()))
}
