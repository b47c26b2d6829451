//! Error types for media upload operations

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors from individual media item uploads
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to read media file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(#[from] BridgeError),

    #[error("Upload rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected upload response: {0}")]
    UnexpectedResponse(String),
}

pub type Result<T> = std::result::Result<T, UploadError>;
