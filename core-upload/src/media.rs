//! # Media Item Model
//!
//! Per-file upload tracking, scoped to one creation session.
//!
//! A [`MediaItem`] is created when media is picked and discarded once the
//! session ends; it is never persisted. Its only lasting effect is the
//! `storage_id` it contributes to a job or backend request.
//!
//! Upload lifecycle per item:
//! `pending -> uploading -> uploaded` on success, or
//! `uploading -> failed` on error. `uploaded` and `failed` are terminal.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Local temporary id for one picked media file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaItemId(String);

impl MediaItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MediaItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MediaItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of picked media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// MIME type sent with the upload body
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Image => "image/jpeg",
            Self::Video => "video/mp4",
        }
    }
}

/// Upload state machine for one media item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Uploaded,
    Failed,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Uploading => "uploading",
            Self::Uploaded => "uploaded",
            Self::Failed => "failed",
        }
    }

    /// True once no further transitions are expected
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Uploaded | Self::Failed)
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One picked media file and its upload progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Local temporary id
    pub id: MediaItemId,

    /// Local file location to read bytes from
    pub uri: String,

    /// Image or video
    pub media_type: MediaType,

    /// Current upload state
    pub upload_status: UploadStatus,

    /// Backend storage handle, present only once uploaded
    pub storage_id: Option<String>,

    /// Failure reason, present only when `failed`
    pub error: Option<String>,
}

impl MediaItem {
    /// New item in the `pending` state.
    pub fn new(uri: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            id: MediaItemId::new(),
            uri: uri.into(),
            media_type,
            upload_status: UploadStatus::Pending,
            storage_id: None,
            error: None,
        }
    }
}
