//! Error types for the HTTP video backend provider

use thiserror::Error;

/// HTTP video backend errors
#[derive(Error, Debug)]
pub enum HttpBackendError {
    /// API request returned an error status
    #[error("Backend API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for HTTP backend operations
pub type Result<T> = std::result::Result<T, HttpBackendError>;

impl From<HttpBackendError> for bridge_traits::error::BridgeError {
    fn from(error: HttpBackendError) -> Self {
        match error {
            HttpBackendError::ApiError {
                status_code,
                message,
            } => bridge_traits::error::BridgeError::Backend {
                status_code,
                message,
            },
            HttpBackendError::ParseError(msg) => {
                bridge_traits::error::BridgeError::OperationFailed(format!("Parse error: {}", msg))
            }
            HttpBackendError::BridgeError(e) => e,
        }
    }
}
