//! HTTP implementation of the video generation backend
//!
//! Implements the `VideoBackend` trait against a JSON-over-HTTP API.
//!
//! Idempotent reads (project listing, single fetch, URL refresh) retry
//! with exponential backoff on 429 and 5xx. Mutations (submit, delete,
//! regenerate, push registration) are issued exactly once; a transparent
//! retry could double-submit a job or double-delete a record.

use async_trait::async_trait;
use bridge_traits::backend::{ProjectSnapshot, RegenerateOutcome, VideoBackend};
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::HttpBackendError;
use crate::types::{ProjectsResponse, UploadUrlResponse, VideoUrlResponse};

/// Retries for idempotent reads
const READ_MAX_RETRIES: u32 = 3;

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Video generation backend over JSON/HTTP
///
/// # Example
///
/// ```ignore
/// use provider_http::HttpVideoBackend;
///
/// let backend = HttpVideoBackend::new(http_client, "https://api.example.com");
/// let snapshots = backend.get_projects("user-1").await?;
/// ```
pub struct HttpVideoBackend {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
}

impl HttpVideoBackend {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET with exponential backoff on 429/5xx
    #[instrument(skip(self), fields(url = %url))]
    async fn get_with_retry(&self, url: String) -> Result<HttpResponse> {
        let mut attempt = 0;

        loop {
            let request = HttpRequest::new(HttpMethod::Get, url.clone())
                .header("Accept", "application/json")
                .timeout(REQUEST_TIMEOUT);

            match self.http_client.execute(request).await {
                Ok(response) if response.is_success() => {
                    debug!(status = response.status, "API request succeeded");
                    return Ok(response);
                }
                Ok(response) if response.status == 429 || response.is_server_error() => {
                    attempt += 1;
                    if attempt >= READ_MAX_RETRIES {
                        warn!(
                            status = response.status,
                            attempts = attempt,
                            "API request exhausted retries"
                        );
                        return Err(HttpBackendError::ApiError {
                            status_code: response.status,
                            message: format!("Request failed after {} retries", attempt),
                        }
                        .into());
                    }

                    let backoff_ms = 100u64 * 2u64.pow(attempt);
                    warn!(
                        status = response.status,
                        attempt, backoff_ms, "Retrying API request"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
                Ok(response) => {
                    // Client error: not retryable.
                    return Err(Self::status_error(&response).into());
                }
                Err(e) => {
                    attempt += 1;
                    if attempt >= READ_MAX_RETRIES {
                        warn!(error = %e, attempts = attempt, "API request exhausted retries");
                        return Err(e);
                    }

                    let backoff_ms = 100u64 * 2u64.pow(attempt);
                    warn!(error = %e, attempt, backoff_ms, "Retrying API request");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        let response = self.get_with_retry(url).await?;
        response
            .json()
            .map_err(|e| HttpBackendError::ParseError(e.to_string()).into())
    }

    /// One-shot mutation, no transparent retry
    async fn send_once(&self, method: HttpMethod, url: String) -> Result<HttpResponse> {
        let request = HttpRequest::new(method, url)
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT);

        let response = self.http_client.execute(request).await?;
        if !response.is_success() {
            return Err(Self::status_error(&response).into());
        }
        Ok(response)
    }

    fn status_error(response: &HttpResponse) -> HttpBackendError {
        HttpBackendError::ApiError {
            status_code: response.status,
            message: String::from_utf8_lossy(&response.body).to_string(),
        }
    }
}

#[async_trait]
impl VideoBackend for HttpVideoBackend {
    #[instrument(skip(self))]
    async fn get_projects(&self, user_id: &str) -> Result<Vec<ProjectSnapshot>> {
        let url = self.url(&format!(
            "/users/{}/projects",
            urlencoding::encode(user_id)
        ));
        let response: ProjectsResponse = self.get_json(url).await?;
        Ok(response.projects)
    }

    #[instrument(skip(self))]
    async fn get_project(&self, project_id: &str) -> Result<ProjectSnapshot> {
        let url = self.url(&format!("/projects/{}", urlencoding::encode(project_id)));
        self.get_json(url).await
    }

    #[instrument(skip(self))]
    async fn delete_project(&self, project_id: &str) -> Result<()> {
        let url = self.url(&format!("/projects/{}", urlencoding::encode(project_id)));
        self.send_once(HttpMethod::Delete, url).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_project_submitted(&self, project_id: &str) -> Result<()> {
        let url = self.url(&format!(
            "/projects/{}/submit",
            urlencoding::encode(project_id)
        ));
        self.send_once(HttpMethod::Post, url).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn regenerate_project_editing(
        &self,
        source_project_id: &str,
    ) -> Result<RegenerateOutcome> {
        let url = self.url(&format!(
            "/projects/{}/regenerate",
            urlencoding::encode(source_project_id)
        ));
        let response = self.send_once(HttpMethod::Post, url).await?;
        response
            .json()
            .map_err(|e| HttpBackendError::ParseError(e.to_string()).into())
    }

    #[instrument(skip(self))]
    async fn generate_upload_url(&self) -> Result<String> {
        let url = self.url("/uploads");
        let response = self.send_once(HttpMethod::Post, url).await?;
        let parsed: UploadUrlResponse = response
            .json()
            .map_err(|e| HttpBackendError::ParseError(e.to_string()))?;
        Ok(parsed.url)
    }

    #[instrument(skip(self))]
    async fn fresh_video_url(&self, project_id: &str) -> Result<String> {
        let url = self.url(&format!(
            "/projects/{}/video-url",
            urlencoding::encode(project_id)
        ));
        let parsed: VideoUrlResponse = self.get_json(url).await?;
        Ok(parsed.url)
    }

    #[instrument(skip(self, token))]
    async fn register_push_token(&self, user_id: &str, token: &str) -> Result<()> {
        let url = self.url(&format!(
            "/users/{}/push-token",
            urlencoding::encode(user_id)
        ));
        let request = HttpRequest::new(HttpMethod::Post, url)
            .json(&serde_json::json!({ "token": token }))?
            .timeout(REQUEST_TIMEOUT);

        let response = self.http_client.execute(request).await?;
        if !response.is_success() {
            return Err(Self::status_error(&response).into());
        }
        Ok(())
    }
}
