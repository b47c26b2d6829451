//! Error types for core assembly and startup

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Job error: {0}")]
    Job(#[from] core_jobs::JobError),

    #[error("Notify error: {0}")]
    Notify(#[from] core_notify::NotifyError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
