//! Shared application state and dispatcher metrics.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use trickle_core::Config;
use trickle_queue::BatchQueue;
use trickle_store::JobStore;

/// State handed to every handler and to the dispatcher task.
///
/// The store and queue are the only mutable shared components; both are
/// internally synchronized, so the whole state travels as one `Arc`.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub store: JobStore,
    pub queue: BatchQueue,
    pub metrics: DispatchMetrics,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let queue = BatchQueue::new(config.ingest.weights);
        Self {
            config,
            store: JobStore::new(),
            queue,
            metrics: DispatchMetrics::new(),
            started_at: Utc::now(),
        }
    }
}

// ── Dispatch metrics ──────────────────────────────────────────────

/// Lock-free counters updated by the dispatcher loop.
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    pub batches_dispatched: AtomicU64,
    pub ids_processed: AtomicU64,
    pub jobs_completed: AtomicU64,
    pub invariant_violations: AtomicU64,
    /// Unix millis of the last dispatch start; 0 = never dispatched.
    pub last_dispatch_unix_ms: AtomicI64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_dispatch(&self, id_count: usize) {
        self.batches_dispatched.fetch_add(1, Ordering::Relaxed);
        self.ids_processed
            .fetch_add(id_count as u64, Ordering::Relaxed);
        self.last_dispatch_unix_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    pub fn record_job_completed(&self) {
        self.jobs_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invariant_violation(&self) {
        self.invariant_violations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, queue_depth: usize) -> Value {
        let last_ms = self.last_dispatch_unix_ms.load(Ordering::Relaxed);
        json!({
            "batches_dispatched": self.batches_dispatched.load(Ordering::Relaxed),
            "ids_processed": self.ids_processed.load(Ordering::Relaxed),
            "jobs_completed": self.jobs_completed.load(Ordering::Relaxed),
            "invariant_violations": self.invariant_violations.load(Ordering::Relaxed),
            "queue_depth": queue_depth,
            "last_dispatch_at": if last_ms == 0 { Value::Null } else { json!(last_ms) },
        })
    }
}
