//! Video Generation Backend Abstraction
//!
//! Defines the contract the client core requires from the remote video
//! generation backend. Only the shape of the surface matters here; the
//! transport lives in a provider crate (e.g. `provider-http`).
//!
//! A central rule for consumers: fields absent on a [`ProjectSnapshot`]
//! are *unknown*, never *cleared*. A backend job that is still processing
//! legitimately omits its playable URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Lifecycle status of a backend project, shared verbatim with the
/// client-side job model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Created but not yet submitted into the generation pipeline
    Draft,
    /// Submitted, waiting for the pipeline to pick it up
    Pending,
    /// Script/TTS/render pipeline is running
    Processing,
    /// Finished; a playable media URL exists
    Ready,
    /// Pipeline reported a terminal failure
    Failed,
}

impl ProjectStatus {
    /// String representation used on the wire and in persisted state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = crate::error::BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "ready" => Ok(Self::Ready),
            "failed" => Ok(Self::Failed),
            _ => Err(crate::error::BridgeError::OperationFailed(format!(
                "Invalid project status: {}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Point-in-time backend record of a project, possibly partial.
///
/// The backend addresses projects by `_id`; everything else is optional
/// and omitted fields must be preserved from local knowledge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Backend project id
    #[serde(rename = "_id")]
    pub id: String,

    /// Project status at fetch time
    pub status: ProjectStatus,

    /// User prompt the project was created from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Generated (or user-edited) script text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    /// Preview image or video reference
    #[serde(default, rename = "thumbnailUrl", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Render-ready media URL; present once the project is ready
    #[serde(default, rename = "videoUrl", skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,

    /// Human-readable failure reason, set when status is failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Backend creation time (Unix seconds)
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl ProjectSnapshot {
    /// Minimal snapshot, useful in tests and as a builder seed
    pub fn new(id: impl Into<String>, status: ProjectStatus) -> Self {
        Self {
            id: id.into(),
            status,
            prompt: None,
            script: None,
            thumbnail_url: None,
            video_url: None,
            error: None,
            created_at: None,
        }
    }
}

/// Result of a regenerate request. Regeneration always creates a new
/// backend project; the source project is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenerateOutcome {
    pub success: bool,
    #[serde(default, rename = "newProjectId", skip_serializing_if = "Option::is_none")]
    pub new_project_id: Option<String>,
}

/// Remote video generation backend
///
/// All methods are request/response; push-style delivery arrives through
/// the platform [`PushBridge`](crate::push::PushBridge) instead.
#[async_trait]
pub trait VideoBackend: Send + Sync {
    /// Bulk fetch of all project snapshots for a user (poll path)
    async fn get_projects(&self, user_id: &str) -> Result<Vec<ProjectSnapshot>>;

    /// Fetch a single project snapshot (on-demand refresh)
    async fn get_project(&self, project_id: &str) -> Result<ProjectSnapshot>;

    /// Delete a project server-side
    ///
    /// Callers must await success before dropping local state.
    async fn delete_project(&self, project_id: &str) -> Result<()>;

    /// Move a draft project into the generation pipeline
    async fn mark_project_submitted(&self, project_id: &str) -> Result<()>;

    /// Re-run generation from an existing project, producing a new one
    async fn regenerate_project_editing(
        &self,
        source_project_id: &str,
    ) -> Result<RegenerateOutcome>;

    /// Obtain a one-shot signed upload URL for a single media file
    async fn generate_upload_url(&self) -> Result<String>;

    /// Obtain a fresh signed playback URL immediately before playback
    async fn fresh_video_url(&self, project_id: &str) -> Result<String>;

    /// Hand the device push token to the backend
    async fn register_push_token(&self, user_id: &str, token: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            ProjectStatus::Draft,
            ProjectStatus::Pending,
            ProjectStatus::Processing,
            ProjectStatus::Ready,
            ProjectStatus::Failed,
        ] {
            let parsed: ProjectStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("bogus".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_snapshot_deserializes_partial_payload() {
        // A processing project omits its media URL; absent fields stay None.
        let json = r#"{"_id":"p1","status":"processing","prompt":"a cat video"}"#;
        let snapshot: ProjectSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.id, "p1");
        assert_eq!(snapshot.status, ProjectStatus::Processing);
        assert_eq!(snapshot.prompt.as_deref(), Some("a cat video"));
        assert!(snapshot.video_url.is_none());
        assert!(snapshot.error.is_none());
    }

    #[test]
    fn test_snapshot_field_names() {
        let json = r#"{
            "_id": "p2",
            "status": "ready",
            "videoUrl": "https://cdn.example/video.mp4",
            "thumbnailUrl": "https://cdn.example/thumb.jpg",
            "createdAt": 1700000000
        }"#;
        let snapshot: ProjectSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(
            snapshot.video_url.as_deref(),
            Some("https://cdn.example/video.mp4")
        );
        assert_eq!(snapshot.created_at, Some(1700000000));
    }
}
