//! HTTP transport abstraction
//!
//! A deliberately thin seam: implementations move bytes, nothing more.
//! Retry belongs to the caller, because only the caller knows whether a
//! request is idempotent (project reads are, submissions and deletions
//! are not). The provider crate retries its own reads; signed-URL
//! uploads are sent exactly once.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// Methods used by the video API and signed-URL uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// One outgoing request, built fluently
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
    /// Per-request deadline; implementations fall back to their own
    /// default when absent
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Serializes `body` as the JSON payload and sets the content type.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let encoded = serde_json::to_vec(body)
            .map_err(|e| BridgeError::OperationFailed(format!("Request encoding: {}", e)))?;
        self.body = Some(Bytes::from(encoded));
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    /// Raw body bytes, e.g. media file contents for a signed-URL upload.
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }
}

/// A fully buffered response
///
/// Responses here are small JSON documents or empty bodies; nothing in
/// the core streams.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| BridgeError::OperationFailed(format!("Response decoding: {}", e)))
    }

    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| BridgeError::OperationFailed(format!("Invalid UTF-8 body: {}", e)))
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 5xx, the retryable class for idempotent reads
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Transport trait implemented per platform
///
/// An implementation sends the request exactly once and reports the
/// response it got, including non-2xx statuses; status handling and
/// retry are caller concerns. Errors are reserved for transport
/// failures (connect, TLS, timeout).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Cheap connectivity probe; defaults to optimistic.
    async fn is_connected(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_accumulates_headers() {
        let request = HttpRequest::new(HttpMethod::Put, "https://upload.example/slot")
            .header("Content-Type", "video/mp4")
            .timeout(Duration::from_secs(5));

        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("video/mp4")
        );
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
        assert!(request.body.is_none());
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = HttpRequest::new(HttpMethod::Post, "https://api.example.com/x")
            .json(&serde_json::json!({ "token": "t" }))
            .unwrap();

        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(request.body.as_deref(), Some(br#"{"token":"t"}"#.as_slice()));
    }

    #[test]
    fn test_status_classification() {
        let ok = HttpResponse {
            status: 204,
            headers: HashMap::new(),
            body: Bytes::new(),
        };
        assert!(ok.is_success());
        assert!(!ok.is_server_error());

        let unavailable = HttpResponse {
            status: 503,
            headers: HashMap::new(),
            body: Bytes::new(),
        };
        assert!(!unavailable.is_success());
        assert!(unavailable.is_server_error());
    }

    #[test]
    fn test_response_json_decodes() {
        let response = HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: Bytes::from_static(b"{\"url\":\"https://x\"}"),
        };
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["url"], "https://x");
    }
}
