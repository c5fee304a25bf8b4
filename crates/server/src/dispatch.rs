//! The dispatcher: single-consumer scheduler loop.
//!
//! One long-lived task drains the batch queue under the rate limiter:
//! wait for work, claim a dispatch slot, pop the best-ranked batch,
//! mark it `triggered`, run the processor, mark it `completed`. Work is
//! awaited before the slot is claimed, so a grant never sits stale over
//! an empty queue and consecutive dispatch starts stay at least one
//! interval apart even across idle stretches. A store error on the
//! internal update path is a programming-invariant violation; it is
//! logged and the loop moves on to the next batch.
//!
//! Shutdown is observed only at the suspension points, never mid-batch,
//! so an in-flight batch always reaches `completed` before the loop
//! exits. There is no recovery story for an unclean kill; the store is
//! process-lifetime anyway.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use trickle_core::job::BatchStatus;
use trickle_queue::{QueuedBatch, RateLimiter};

use crate::state::AppState;

// ── Processing seam ──────────────────────────────────────────────

/// The work performed for a dispatched batch.
///
/// The baseline implementation simulates ingestion with a fixed delay
/// per id; real ingestion work plugs in here.
#[async_trait]
pub trait BatchProcessor: Send + Sync {
    async fn process(&self, batch: &QueuedBatch);
}

/// Simulated processing: sleeps `delay_per_id` for every id in the batch.
#[derive(Debug, Clone)]
pub struct SimulatedProcessor {
    delay_per_id: Duration,
}

impl SimulatedProcessor {
    pub fn new(delay_per_id: Duration) -> Self {
        Self { delay_per_id }
    }
}

#[async_trait]
impl BatchProcessor for SimulatedProcessor {
    async fn process(&self, batch: &QueuedBatch) {
        for id in &batch.ids {
            debug!(batch_id = %batch.batch_id, id = *id, "processing id");
            tokio::time::sleep(self.delay_per_id).await;
        }
    }
}

// ── Dispatcher ───────────────────────────────────────────────────

/// Handle to a running dispatcher task.
pub struct DispatcherHandle {
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl DispatcherHandle {
    /// Ask the loop to stop at its next suspension point.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Wait for the loop to exit.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Spawn the dispatcher loop on the current runtime.
pub fn spawn_dispatcher(
    state: Arc<AppState>,
    processor: Arc<dyn BatchProcessor>,
) -> DispatcherHandle {
    let shutdown = Arc::new(Notify::new());
    let task = tokio::spawn(run_dispatcher(state, processor, shutdown.clone()));
    DispatcherHandle { shutdown, task }
}

/// The scheduler loop. Runs until `shutdown` is notified.
///
/// Order per iteration: wait for work, claim a rate-limit slot, pop,
/// dispatch. Claiming the slot only once work is waiting keeps every
/// grant adjacent to its dispatch start.
pub async fn run_dispatcher(
    state: Arc<AppState>,
    processor: Arc<dyn BatchProcessor>,
    shutdown: Arc<Notify>,
) {
    let limiter = RateLimiter::new(state.config.ingest.rate_limit_interval());
    info!(
        interval_ms = state.config.ingest.rate_limit_interval_ms,
        "dispatcher started"
    );

    loop {
        // Shutdown wins every race against pending work.
        tokio::select! {
            biased;
            _ = shutdown.notified() => break,
            _ = state.queue.ready() => {}
        }
        tokio::select! {
            biased;
            _ = shutdown.notified() => break,
            _ = limiter.await_slot() => {}
        }
        let batch = tokio::select! {
            biased;
            _ = shutdown.notified() => break,
            batch = state.queue.dequeue() => batch,
        };
        dispatch_one(&state, processor.as_ref(), batch).await;
    }

    info!("dispatcher stopped");
}

/// Run one batch through its lifecycle: triggered → process → completed.
async fn dispatch_one(state: &AppState, processor: &dyn BatchProcessor, batch: QueuedBatch) {
    match state
        .store
        .update_batch_status(batch.batch_id, BatchStatus::Triggered)
    {
        Ok(job_status) => {
            state.metrics.record_dispatch(batch.ids.len());
            info!(
                batch_id = %batch.batch_id,
                ingestion_id = %batch.ingestion_id,
                priority = %batch.priority,
                ids = batch.ids.len(),
                job_status = %job_status,
                "batch triggered"
            );
        }
        Err(err) => {
            state.metrics.record_invariant_violation();
            error!(
                batch_id = %batch.batch_id,
                error = %err,
                "failed to trigger batch; skipping"
            );
            return;
        }
    }

    processor.process(&batch).await;

    match state
        .store
        .update_batch_status(batch.batch_id, BatchStatus::Completed)
    {
        Ok(job_status) => {
            info!(
                batch_id = %batch.batch_id,
                ingestion_id = %batch.ingestion_id,
                job_status = %job_status,
                "batch completed"
            );
            if job_status == BatchStatus::Completed {
                state.metrics.record_job_completed();
                info!(ingestion_id = %batch.ingestion_id, "ingestion job completed");
            }
        }
        Err(err) => {
            state.metrics.record_invariant_violation();
            error!(
                batch_id = %batch.batch_id,
                error = %err,
                "failed to complete batch"
            );
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
