//! Priority-ordered queue of pending batches.
//!
//! Ordering is a strict total order on (weight, enqueued_at, seq):
//! lower weight first, then earlier enqueue time, then lower sequence
//! number. The sequence number keeps the order deterministic even when
//! two batches land on the same timestamp.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tokio::sync::Notify;
use tracing::debug;
use uuid::Uuid;

use trickle_core::config::PriorityWeights;
use trickle_core::job::Priority;

// ── Queued batch ─────────────────────────────────────────────────────

/// A batch as it sits in the queue, with its dispatch sort key.
#[derive(Debug, Clone)]
pub struct QueuedBatch {
    pub batch_id: Uuid,
    pub ingestion_id: Uuid,
    pub ids: Vec<u64>,
    pub priority: Priority,
    /// Weight resolved at enqueue time; lower dispatches first.
    pub weight: u8,
    pub enqueued_at: DateTime<Utc>,
    seq: u64,
}

impl QueuedBatch {
    fn sort_key(&self) -> (u8, DateTime<Utc>, u64) {
        (self.weight, self.enqueued_at, self.seq)
    }
}

impl PartialEq for QueuedBatch {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for QueuedBatch {}

impl PartialOrd for QueuedBatch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedBatch {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

// ── Queue ────────────────────────────────────────────────────────────

/// Unbounded priority queue with a suspending dequeue.
///
/// Enqueue never blocks and is safe against concurrent enqueues and a
/// concurrent dequeue. [`BatchQueue::dequeue`] suspends while the queue
/// is empty; waiters wake in FIFO order, so the contract also holds if
/// more consumers are ever added.
#[derive(Debug)]
pub struct BatchQueue {
    weights: PriorityWeights,
    heap: Mutex<BinaryHeap<Reverse<QueuedBatch>>>,
    notify: Notify,
    next_seq: AtomicU64,
}

impl BatchQueue {
    pub fn new(weights: PriorityWeights) -> Self {
        Self {
            weights,
            heap: Mutex::new(BinaryHeap::new()),
            notify: Notify::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Insert a batch and wake one waiting consumer.
    pub fn enqueue(&self, batch_id: Uuid, ingestion_id: Uuid, ids: Vec<u64>, priority: Priority) {
        let batch = QueuedBatch {
            batch_id,
            ingestion_id,
            ids,
            priority,
            weight: self.weights.weight_for(priority),
            enqueued_at: Utc::now(),
            seq: self.next_seq.fetch_add(1, AtomicOrdering::Relaxed),
        };
        debug!(
            batch_id = %batch.batch_id,
            priority = %batch.priority,
            weight = batch.weight,
            "batch enqueued"
        );
        self.heap.lock().unwrap().push(Reverse(batch));
        self.notify.notify_one();
    }

    /// Pop the best-ranked batch, or `None` when empty.
    pub fn try_dequeue(&self) -> Option<QueuedBatch> {
        self.heap.lock().unwrap().pop().map(|Reverse(b)| b)
    }

    /// Pop the best-ranked batch, suspending while the queue is empty.
    pub async fn dequeue(&self) -> QueuedBatch {
        loop {
            // Register for a wakeup before checking, so an enqueue that
            // lands between the check and the await is not lost.
            let notified = self.notify.notified();
            if let Some(batch) = self.try_dequeue() {
                return batch;
            }
            notified.await;
        }
    }

    /// Suspend until the queue holds at least one batch, without popping.
    pub async fn ready(&self) {
        loop {
            let notified = self.notify.notified();
            if !self.is_empty() {
                return;
            }
            notified.await;
        }
    }

    pub fn len(&self) -> usize {
        self.heap.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BatchQueue {
    fn default() -> Self {
        Self::new(PriorityWeights::default())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
