use thiserror::Error;
use uuid::Uuid;

use crate::job::BatchStatus;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Ingestion job not found: {0}")]
    JobNotFound(Uuid),

    #[error("Batch not found: {0}")]
    BatchNotFound(Uuid),

    #[error("Duplicate ingestion id: {0}")]
    DuplicateId(Uuid),

    #[error("Illegal batch status transition: {from} -> {to}")]
    InvalidTransition {
        from: BatchStatus,
        to: BatchStatus,
    },
}
