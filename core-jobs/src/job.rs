//! # Job Model
//!
//! The client's local representation of one video generation request and
//! its lifecycle, plus the status rank used for regression protection.
//!
//! ## Overview
//!
//! A [`Job`] is created the instant the user commits to an action and is
//! removed only by explicit deletion. Its id is either a client-generated
//! placeholder assigned at creation time or the backend project id once
//! the backend record exists. Regeneration always produces a job with a
//! **new** id; it never mutates the source job.
//!
//! Statuses are ordered by [`rank`](JobStatusExt::rank):
//! `draft(0) < pending(1) < {processing, failed}(2) < ready(3)`.
//! `processing` and `failed` are siblings at rank 2; `ready` is terminal
//! and strictly dominant.

use bridge_traits::backend::ProjectSnapshot;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use bridge_traits::backend::ProjectStatus as JobStatus;

/// Stable job identity.
///
/// Unique within the store. Placeholder ids are UUIDs minted locally;
/// backend-born jobs use the backend project id directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Wraps an existing id (typically a backend project id).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a client-side placeholder id for a job that has no backend
    /// record yet.
    pub fn placeholder() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Rank and lifecycle helpers on [`JobStatus`].
pub trait JobStatusExt {
    /// Total-order rank for regression protection.
    fn rank(&self) -> u8;

    /// True for statuses the poller must keep fresh.
    fn is_in_flight(&self) -> bool;

    /// True for statuses with no further expected transitions.
    fn is_terminal(&self) -> bool;
}

impl JobStatusExt for JobStatus {
    fn rank(&self) -> u8 {
        match self {
            JobStatus::Draft => 0,
            JobStatus::Pending => 1,
            JobStatus::Processing | JobStatus::Failed => 2,
            JobStatus::Ready => 3,
        }
    }

    fn is_in_flight(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Processing)
    }

    fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Ready | JobStatus::Failed)
    }
}

/// A user-visible video generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Stable identity, unique within the store
    pub id: JobId,

    /// Backend correlation key, set once the backend job exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Lifecycle status
    pub status: JobStatus,

    /// Playable media location, carried from the backend once ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// User prompt text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Generated or user-edited script text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    /// Optional preview image/video reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Creation time (Unix seconds), used for list ordering
    pub created_at: i64,

    /// Human-readable failure reason, set only when failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// Creates a local draft with a placeholder id.
    pub fn draft(prompt: impl Into<String>) -> Self {
        Self {
            id: JobId::placeholder(),
            project_id: None,
            status: JobStatus::Draft,
            uri: None,
            prompt: Some(prompt.into()),
            script: None,
            thumbnail_url: None,
            created_at: chrono::Utc::now().timestamp(),
            error: None,
        }
    }

    /// Builds a job from a backend snapshot the store has never seen.
    ///
    /// The snapshot's project id becomes both the local id and the
    /// correlation key.
    pub fn from_snapshot(snapshot: &ProjectSnapshot) -> Self {
        Self {
            id: JobId::new(snapshot.id.clone()),
            project_id: Some(snapshot.id.clone()),
            status: snapshot.status,
            uri: snapshot.video_url.clone(),
            prompt: snapshot.prompt.clone(),
            script: snapshot.script.clone(),
            thumbnail_url: snapshot.thumbnail_url.clone(),
            created_at: snapshot
                .created_at
                .unwrap_or_else(|| chrono::Utc::now().timestamp()),
            error: snapshot.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order() {
        assert!(JobStatus::Draft.rank() < JobStatus::Pending.rank());
        assert!(JobStatus::Pending.rank() < JobStatus::Processing.rank());
        assert_eq!(JobStatus::Processing.rank(), JobStatus::Failed.rank());
        assert!(JobStatus::Failed.rank() < JobStatus::Ready.rank());
    }

    #[test]
    fn test_in_flight_and_terminal() {
        assert!(JobStatus::Pending.is_in_flight());
        assert!(JobStatus::Processing.is_in_flight());
        assert!(!JobStatus::Draft.is_in_flight());
        assert!(!JobStatus::Ready.is_in_flight());

        assert!(JobStatus::Ready.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn test_placeholder_ids_are_unique() {
        assert_ne!(JobId::placeholder(), JobId::placeholder());
    }

    #[test]
    fn test_from_snapshot_links_project_id() {
        let mut snapshot =
            ProjectSnapshot::new("p1", JobStatus::Ready);
        snapshot.video_url = Some("https://cdn.example/v.mp4".to_string());
        snapshot.created_at = Some(1700000000);

        let job = Job::from_snapshot(&snapshot);
        assert_eq!(job.id.as_str(), "p1");
        assert_eq!(job.project_id.as_deref(), Some("p1"));
        assert_eq!(job.uri.as_deref(), Some("https://cdn.example/v.mp4"));
        assert_eq!(job.created_at, 1700000000);
    }

    #[test]
    fn test_job_serde_round_trip() {
        let job = Job::draft("a sunset over the sea");
        let json = serde_json::to_string(&job).unwrap();
        let back: Job = serde_json::from_str(&json).unwrap();
        assert_eq!(back, job);
    }
}
