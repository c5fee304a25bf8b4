//! Integration tests for the HTTP surface.
//!
//! Each test drives the real router via `tower::ServiceExt::oneshot`
//! without spawning the dispatcher, so submitted batches stay queued at
//! `yet_to_start` and the tests see the pure request/response contract.
//! End-to-end dispatch behavior lives in `dispatch_flow.rs`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use trickle_core::Config;
use trickle_server::{build_app_state, build_router, AppState};

// ── Helpers ─────────────────────────────────────────────────────────

fn test_app() -> (Arc<AppState>, Router) {
    let state = build_app_state(Config::default());
    let router = build_router(state.clone());
    (state, router)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Submit ids and return the ingestion id from the response.
async fn submit(app: &Router, ids: Value, priority: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json("/ingest", json!({ "ids": ids, "priority": priority })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    body["ingestion_id"].as_str().unwrap().to_string()
}

// ── Submission ──────────────────────────────────────────────────────

#[tokio::test]
async fn ingest_returns_a_job_id() {
    let (_state, app) = test_app();

    let id = submit(&app, json!([1, 2, 3, 4, 5]), "HIGH").await;
    assert!(Uuid::parse_str(&id).is_ok(), "ingestion_id must be a UUID");
}

#[tokio::test]
async fn ingest_partitions_ids_in_order() {
    let (_state, app) = test_app();

    let id = submit(&app, json!([1, 2, 3, 4, 5]), "HIGH").await;
    let response = app.oneshot(get(&format!("/status/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["ingestion_id"], id.as_str());
    assert_eq!(body["status"], "yet_to_start");

    let batches = body["batches"].as_array().unwrap();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0]["ids"], json!([1, 2, 3]));
    assert_eq!(batches[1]["ids"], json!([4, 5]));
    for batch in batches {
        assert_eq!(batch["status"], "yet_to_start");
        assert!(Uuid::parse_str(batch["batch_id"].as_str().unwrap()).is_ok());
    }
}

#[tokio::test]
async fn ingest_caps_every_batch_at_batch_size() {
    let (_state, app) = test_app();

    let ids: Vec<u64> = (0..10).collect();
    let id = submit(&app, json!(ids), "HIGH").await;
    let body = json_body(app.oneshot(get(&format!("/status/{}", id))).await.unwrap()).await;

    let batches = body["batches"].as_array().unwrap();
    assert_eq!(batches.len(), 4, "10 ids at size 3 make 3+3+3+1");
    for batch in &batches[..3] {
        assert_eq!(batch["ids"].as_array().unwrap().len(), 3);
    }
    assert_eq!(batches[3]["ids"], json!([9]));

    // Concatenating the batches reproduces the submission exactly.
    let flattened: Vec<u64> = batches
        .iter()
        .flat_map(|b| b["ids"].as_array().unwrap().iter())
        .map(|v| v.as_u64().unwrap())
        .collect();
    assert_eq!(flattened, ids);
}

#[tokio::test]
async fn ingest_enqueues_one_entry_per_batch() {
    let (state, app) = test_app();

    submit(&app, json!([1, 2, 3, 4, 5, 6, 7]), "MEDIUM").await;
    assert_eq!(state.queue.len(), 3);
    assert_eq!(state.store.len(), 1);
}

#[tokio::test]
async fn ingest_rejects_empty_id_list() {
    let (state, app) = test_app();

    let response = app
        .oneshot(post_json("/ingest", json!({ "ids": [], "priority": "HIGH" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("ids"));
    // Nothing was created or queued.
    assert!(state.store.is_empty());
    assert!(state.queue.is_empty());
}

#[tokio::test]
async fn ingest_rejects_unknown_priority() {
    let (_state, app) = test_app();

    let response = app
        .oneshot(post_json(
            "/ingest",
            json!({ "ids": [1], "priority": "URGENT" }),
        ))
        .await
        .unwrap();
    // Serde-level rejection from the Json extractor.
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn ingest_rejects_malformed_json() {
    let (_state, app) = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/ingest")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ingest_defaults_priority_to_medium() {
    let (_state, app) = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/ingest", json!({ "ids": [1, 2] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(app.oneshot(get("/jobs")).await.unwrap()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["jobs"][0]["priority"], "MEDIUM");
}

// ── Status queries ──────────────────────────────────────────────────

#[tokio::test]
async fn status_of_unknown_job_is_not_found() {
    let (_state, app) = test_app();

    let response = app
        .oneshot(get(&format!("/status/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn status_of_malformed_id_is_not_found() {
    let (_state, app) = test_app();

    let response = app.oneshot(get("/status/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn jobs_lists_submissions_oldest_first() {
    let (_state, app) = test_app();

    let first = submit(&app, json!([1]), "LOW").await;
    let second = submit(&app, json!([2, 3, 4, 5]), "HIGH").await;

    let body = json_body(app.oneshot(get("/jobs")).await.unwrap()).await;
    assert_eq!(body["count"], 2);

    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs[0]["ingestion_id"], first.as_str());
    assert_eq!(jobs[0]["priority"], "LOW");
    assert_eq!(jobs[0]["batches_total"], 1);
    assert_eq!(jobs[1]["ingestion_id"], second.as_str());
    assert_eq!(jobs[1]["batches_total"], 2);
    assert_eq!(jobs[1]["batches_completed"], 0);
    assert_eq!(jobs[1]["status"], "yet_to_start");
}

// ── Health and metrics ──────────────────────────────────────────────

#[tokio::test]
async fn health_reports_queue_depth_and_job_count() {
    let (_state, app) = test_app();

    submit(&app, json!([1, 2, 3, 4, 5]), "HIGH").await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["queue_depth"], 2);
    assert_eq!(body["jobs"], 1);
}

#[tokio::test]
async fn scheduler_metrics_start_at_zero() {
    let (_state, app) = test_app();

    let body = json_body(app.oneshot(get("/scheduler/metrics")).await.unwrap()).await;
    assert_eq!(body["batches_dispatched"], 0);
    assert_eq!(body["ids_processed"], 0);
    assert_eq!(body["jobs_completed"], 0);
    assert_eq!(body["invariant_violations"], 0);
    assert_eq!(body["queue_depth"], 0);
    assert_eq!(body["last_dispatch_at"], Value::Null);
}
