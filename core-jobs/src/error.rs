//! Error types for job tracking operations

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors from job store, reconciliation and project operations
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Job has no script to approve: {0}")]
    MissingScript(String),

    #[error("Job has no backend project id: {0}")]
    NotLinked(String),

    #[error("Job is not ready for playback: {0} (status: {1})")]
    NotReady(String, String),

    #[error("No user id linked to this session")]
    NoUser,

    #[error("Backend error: {0}")]
    Backend(#[from] BridgeError),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JobError>;
