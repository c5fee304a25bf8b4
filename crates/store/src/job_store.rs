//! Authoritative in-memory job store.
//!
//! Jobs are keyed by ingestion id with insertion order preserved, plus
//! a reverse index from batch id to owning job so the dispatcher can
//! update status without scanning. All mutation happens under a single
//! write lock; reads hand out consistent snapshots.

use std::collections::HashMap;
use std::sync::RwLock;

use indexmap::IndexMap;
use uuid::Uuid;

use trickle_core::error::IngestError;
use trickle_core::job::{BatchStatus, Job};

#[derive(Debug, Default)]
struct StoreInner {
    jobs: IndexMap<Uuid, Job>,
    /// batch_id → owning ingestion_id.
    batch_index: HashMap<Uuid, Uuid>,
}

/// Thread-safe mapping from ingestion id to [`Job`].
///
/// Request handlers insert jobs; the dispatcher is the only writer of
/// batch status. A reader can never observe a batch mid-transition with
/// stale job-level aggregation, because the derived status is computed
/// under the same lock that applies the transition.
#[derive(Debug, Default)]
pub struct JobStore {
    inner: RwLock<StoreInner>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new job with all of its batches, and register every
    /// batch in the reverse index.
    pub fn create(&self, job: Job) -> Result<(), IngestError> {
        let mut inner = self.inner.write().unwrap();
        if inner.jobs.contains_key(&job.ingestion_id) {
            return Err(IngestError::DuplicateId(job.ingestion_id));
        }
        for batch in &job.batches {
            inner.batch_index.insert(batch.batch_id, job.ingestion_id);
        }
        inner.jobs.insert(job.ingestion_id, job);
        Ok(())
    }

    /// Snapshot of one job.
    pub fn get(&self, ingestion_id: Uuid) -> Result<Job, IngestError> {
        let inner = self.inner.read().unwrap();
        inner
            .jobs
            .get(&ingestion_id)
            .cloned()
            .ok_or(IngestError::JobNotFound(ingestion_id))
    }

    /// Apply a monotone batch status transition and return the owning
    /// job's freshly derived status.
    pub fn update_batch_status(
        &self,
        batch_id: Uuid,
        next: BatchStatus,
    ) -> Result<BatchStatus, IngestError> {
        let mut inner = self.inner.write().unwrap();
        let ingestion_id = *inner
            .batch_index
            .get(&batch_id)
            .ok_or(IngestError::BatchNotFound(batch_id))?;
        let job = inner
            .jobs
            .get_mut(&ingestion_id)
            .ok_or(IngestError::JobNotFound(ingestion_id))?;
        let batch = job
            .batches
            .iter_mut()
            .find(|b| b.batch_id == batch_id)
            .ok_or(IngestError::BatchNotFound(batch_id))?;

        if !batch.status.can_transition_to(next) {
            return Err(IngestError::InvalidTransition {
                from: batch.status,
                to: next,
            });
        }
        batch.status = next;
        Ok(job.status())
    }

    /// Insertion-ordered snapshot of every job.
    pub fn jobs(&self) -> Vec<Job> {
        self.inner.read().unwrap().jobs.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Tests ────────────────────────────────────────────────────────────
