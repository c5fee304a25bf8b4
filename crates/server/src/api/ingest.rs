//! Submission and status endpoints.
//!
//! SRP: everything that creates jobs or reads them back out.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use trickle_core::error::IngestError;
use trickle_core::job::{BatchStatus, Job, Priority};

use crate::state::AppState;

use super::error_response;

// ── Request / response shapes ────────────────────────────────────

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct IngestRequest {
    /// Identifiers to ingest, in submission order.
    pub ids: Vec<u64>,
    /// Defaults to MEDIUM when omitted.
    #[serde(default)]
    #[schema(value_type = String, example = "HIGH")]
    pub priority: Priority,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct IngestResponse {
    #[schema(value_type = String)]
    pub ingestion_id: Uuid,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BatchView {
    #[schema(value_type = String)]
    pub batch_id: Uuid,
    pub ids: Vec<u64>,
    #[schema(value_type = String, example = "triggered")]
    pub status: BatchStatus,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JobStatusResponse {
    #[schema(value_type = String)]
    pub ingestion_id: Uuid,
    #[schema(value_type = String, example = "triggered")]
    pub status: BatchStatus,
    pub batches: Vec<BatchView>,
}

impl JobStatusResponse {
    fn from_job(job: &Job) -> Self {
        Self {
            ingestion_id: job.ingestion_id,
            status: job.status(),
            batches: job
                .batches
                .iter()
                .map(|b| BatchView {
                    batch_id: b.batch_id,
                    ids: b.ids.clone(),
                    status: b.status,
                })
                .collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────

/// Accept a bulk ingestion request
#[utoipa::path(
    post,
    path = "/ingest",
    tag = "Ingestion",
    request_body = IngestRequest,
    responses(
        (status = 200, description = "Job accepted and batches queued", body = IngestResponse),
        (status = 400, description = "Empty id list", body = Object),
    )
)]
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, (StatusCode, Json<Value>)> {
    if req.ids.is_empty() {
        return Err(error_response(IngestError::Validation(
            "ids must not be empty".to_string(),
        )));
    }

    let job = Job::new(&req.ids, req.priority, state.config.ingest.batch_size);
    let ingestion_id = job.ingestion_id;
    let batch_refs: Vec<(Uuid, Vec<u64>)> = job
        .batches
        .iter()
        .map(|b| (b.batch_id, b.ids.clone()))
        .collect();
    let batch_count = batch_refs.len();

    // Store first: the dispatcher must be able to resolve a batch the
    // instant it is dequeued.
    state.store.create(job).map_err(error_response)?;
    for (batch_id, ids) in batch_refs {
        state.queue.enqueue(batch_id, ingestion_id, ids, req.priority);
    }

    info!(
        ingestion_id = %ingestion_id,
        priority = %req.priority,
        ids = req.ids.len(),
        batches = batch_count,
        "ingestion request accepted"
    );
    Ok(Json(IngestResponse { ingestion_id }))
}

/// Job status with per-batch detail
#[utoipa::path(
    get,
    path = "/status/{ingestion_id}",
    tag = "Ingestion",
    params(
        ("ingestion_id" = String, Path, description = "Job identifier returned by POST /ingest")
    ),
    responses(
        (status = 200, description = "Job and batch statuses", body = JobStatusResponse),
        (status = 404, description = "Unknown or malformed ingestion id", body = Object),
    )
)]
pub async fn status(
    State(state): State<Arc<AppState>>,
    Path(ingestion_id): Path<String>,
) -> Result<Json<JobStatusResponse>, (StatusCode, Json<Value>)> {
    // A malformed id is reported exactly like an unknown one.
    let id = Uuid::parse_str(&ingestion_id).map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Ingestion job not found: {}", ingestion_id) })),
        )
    })?;
    let job = state.store.get(id).map_err(error_response)?;
    Ok(Json(JobStatusResponse::from_job(&job)))
}

/// GET /jobs — list all jobs, oldest first.
pub async fn jobs_list(State(state): State<Arc<AppState>>) -> Json<Value> {
    let jobs: Vec<Value> = state
        .store
        .jobs()
        .iter()
        .map(|job| {
            json!({
                "ingestion_id": job.ingestion_id,
                "priority": job.priority,
                "status": job.status(),
                "created_at": job.created_at,
                "batches_total": job.batches.len(),
                "batches_completed": job
                    .batches
                    .iter()
                    .filter(|b| b.status == BatchStatus::Completed)
                    .count(),
            })
        })
        .collect();
    Json(json!({ "count": jobs.len(), "jobs": jobs }))
}
