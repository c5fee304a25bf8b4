//! OpenAPI documentation aggregator.
//!
//! Collects all `#[utoipa::path]`-annotated handlers and `ToSchema`-derived
//! types into a single OpenAPI 3.1 spec, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "trickle API",
        version = "0.1.0",
        description = "Bulk identifier ingestion with priority batching and rate-limited dispatch.",
    ),
    tags(
        (name = "Ingestion", description = "Submit id lists and poll job/batch status"),
        (name = "Health", description = "Service liveness and dispatcher gauges"),
    ),
    paths(
        crate::api::ingest::ingest,
        crate::api::ingest::status,
        crate::api::health::health,
    ),
    components(schemas(
        crate::api::ingest::IngestRequest,
        crate::api::ingest::IngestResponse,
        crate::api::ingest::JobStatusResponse,
        crate::api::ingest::BatchView,
        crate::api::health::HealthResponse,
    ))
)]
pub struct ApiDoc;
