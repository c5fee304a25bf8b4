//! Job and batch domain types.
//!
//! A submission becomes a [`Job`] whose ids are partitioned, in order,
//! into [`Batch`]es of at most `batch_size` ids each. Batch status only
//! ever advances; job status is derived from the batches, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Priority ─────────────────────────────────────────────────────────

/// Submission priority. Maps to a queue weight; lower weight dispatches
/// first (see [`crate::config::PriorityWeights`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        };
        write!(f, "{}", s)
    }
}

// ── Batch status ─────────────────────────────────────────────────────

/// Lifecycle of a batch (and, by derivation, of a job).
///
/// Transitions are monotone: `yet_to_start → triggered → completed`.
/// A batch never moves backwards and never skips `triggered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    YetToStart,
    Triggered,
    Completed,
}

impl BatchStatus {
    /// Whether `self → next` is a legal forward step.
    pub fn can_transition_to(self, next: BatchStatus) -> bool {
        matches!(
            (self, next),
            (BatchStatus::YetToStart, BatchStatus::Triggered)
                | (BatchStatus::Triggered, BatchStatus::Completed)
        )
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BatchStatus::YetToStart => "yet_to_start",
            BatchStatus::Triggered => "triggered",
            BatchStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

// ── Batch ────────────────────────────────────────────────────────────

/// One unit of dispatchable work: a bounded chunk of ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub batch_id: Uuid,
    pub ids: Vec<u64>,
    pub status: BatchStatus,
}

impl Batch {
    /// New batch at `yet_to_start` with a fresh id.
    pub fn new(ids: Vec<u64>) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            ids,
            status: BatchStatus::YetToStart,
        }
    }
}

// ── Job ──────────────────────────────────────────────────────────────

/// One client submission, partitioned into batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub ingestion_id: Uuid,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub batches: Vec<Batch>,
}

impl Job {
    /// Build a job from submitted ids, chunked into consecutive batches
    /// of at most `batch_size` ids. Concatenating the batches in order
    /// reproduces the submitted sequence exactly.
    pub fn new(ids: &[u64], priority: Priority, batch_size: usize) -> Self {
        let batches = ids
            .chunks(batch_size.max(1))
            .map(|chunk| Batch::new(chunk.to_vec()))
            .collect();
        Self {
            ingestion_id: Uuid::new_v4(),
            priority,
            created_at: Utc::now(),
            batches,
        }
    }

    /// Aggregate status: `yet_to_start` while no batch has run,
    /// `completed` once every batch has, `triggered` in between.
    pub fn status(&self) -> BatchStatus {
        if self
            .batches
            .iter()
            .all(|b| b.status == BatchStatus::YetToStart)
        {
            BatchStatus::YetToStart
        } else if self
            .batches
            .iter()
            .all(|b| b.status == BatchStatus::Completed)
        {
            BatchStatus::Completed
        } else {
            BatchStatus::Triggered
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
