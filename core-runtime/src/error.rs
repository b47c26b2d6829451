//! Error types for runtime configuration and logging setup

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration value or logging filter
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required platform bridge was not injected
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
