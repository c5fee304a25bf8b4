//! Domain-focused API endpoint modules.
//!
//! Each sub-module owns a single responsibility area.
//! The shared error mapping lives here in mod.rs.

pub mod doc;
mod health;
mod ingest;

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use trickle_core::error::IngestError;

// ── Error mapping ────────────────────────────────────────────────

/// Map a domain error to an HTTP status and an `{"error": ...}` body.
pub(crate) fn error_response(err: IngestError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        IngestError::Validation(_) => StatusCode::BAD_REQUEST,
        IngestError::JobNotFound(_) | IngestError::BatchNotFound(_) => StatusCode::NOT_FOUND,
        IngestError::DuplicateId(_) => StatusCode::CONFLICT,
        IngestError::InvalidTransition { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

// ── Re-exports ───────────────────────────────────────────────────
// Preserves flat `api::foo` import paths used by router registration.

pub use health::{health, scheduler_metrics};
pub use ingest::{ingest, jobs_list, status};
