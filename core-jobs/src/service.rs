//! # Project Service
//!
//! User-action entry points over the job store and backend: create,
//! submit, regenerate, delete, refresh, playback.
//!
//! ## Overview
//!
//! Every user action applies its optimistic store mutation first so the
//! UI responds instantly, then issues the backend mutation. Two
//! exceptions, both deliberate:
//!
//! - **Deletion is backend-first.** The local entry is removed only after
//!   the backend confirms, so a rejected deletion never leaves the UI
//!   believing a job is gone while the backend record persists.
//! - **Local precondition violations** (approving without a script,
//!   operating on a job with no backend correlation) are rejected before
//!   any network call.

use crate::error::{JobError, Result};
use crate::job::{Job, JobId, JobStatus};
use crate::reconciler::{merge_snapshot, Reconciler};
use crate::store::JobStore;
use bridge_traits::backend::VideoBackend;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// User-facing operations on video generation jobs
pub struct ProjectService {
    store: Arc<JobStore>,
    backend: Arc<dyn VideoBackend>,
    reconciler: Arc<Reconciler>,
}

impl ProjectService {
    pub fn new(
        store: Arc<JobStore>,
        backend: Arc<dyn VideoBackend>,
        reconciler: Arc<Reconciler>,
    ) -> Self {
        Self {
            store,
            backend,
            reconciler,
        }
    }

    /// Creates a local draft the instant the user commits to an action.
    ///
    /// The draft carries a placeholder id until a backend record exists.
    #[instrument(skip(self, prompt))]
    pub async fn create_draft(&self, prompt: impl Into<String>) -> Job {
        let job = Job::draft(prompt);
        info!(job_id = %job.id, "Created draft job");
        self.store.upsert(job.clone()).await;
        job
    }

    /// Approves a job's script and submits it into the generation
    /// pipeline.
    ///
    /// The optimistic `processing` transition happens before the backend
    /// call resolves; a failed submission is returned to the caller while
    /// the next poll cycle corrects the visible state.
    #[instrument(skip(self))]
    pub async fn submit(&self, id: &JobId) -> Result<()> {
        let job = self.require(id)?;

        if job.script.as_deref().unwrap_or("").is_empty() {
            return Err(JobError::MissingScript(id.to_string()));
        }
        let project_id = job
            .project_id
            .clone()
            .ok_or_else(|| JobError::NotLinked(id.to_string()))?;

        let mut optimistic = job;
        optimistic.status = JobStatus::Processing;
        self.store.upsert(optimistic).await;

        if let Err(e) = self.backend.mark_project_submitted(&project_id).await {
            warn!(job_id = %id, error = %e, "Submission failed after optimistic transition");
            return Err(e.into());
        }

        Ok(())
    }

    /// Re-runs generation from an existing job.
    ///
    /// Always inserts a **new** `processing` job under the backend's new
    /// project id; the source job is never mutated.
    #[instrument(skip(self))]
    pub async fn regenerate(&self, source_id: &JobId) -> Result<Job> {
        let source = self.require(source_id)?;
        let project_id = source
            .project_id
            .clone()
            .ok_or_else(|| JobError::NotLinked(source_id.to_string()))?;

        let outcome = self.backend.regenerate_project_editing(&project_id).await?;

        let new_project_id = match (outcome.success, outcome.new_project_id) {
            (true, Some(pid)) => pid,
            _ => {
                return Err(JobError::Backend(
                    bridge_traits::error::BridgeError::OperationFailed(
                        "Regeneration did not produce a new project".to_string(),
                    ),
                ))
            }
        };

        let new_job = Job {
            id: JobId::new(new_project_id.clone()),
            project_id: Some(new_project_id),
            status: JobStatus::Processing,
            uri: None,
            prompt: source.prompt.clone(),
            script: source.script.clone(),
            thumbnail_url: source.thumbnail_url.clone(),
            created_at: chrono::Utc::now().timestamp(),
            error: None,
        };

        info!(source = %source_id, new = %new_job.id, "Regenerated into new job");
        self.store.upsert(new_job.clone()).await;
        Ok(new_job)
    }

    /// Deletes a job, backend-first.
    ///
    /// On backend rejection the local state is left untouched and the
    /// error is surfaced; there is no optimistic removal.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &JobId) -> Result<()> {
        let job = self.require(id)?;
        let project_id = job
            .project_id
            .ok_or_else(|| JobError::NotLinked(id.to_string()))?;

        self.backend.delete_project(&project_id).await?;
        self.store.remove(id).await;
        info!(job_id = %id, "Deleted job");
        Ok(())
    }

    /// On-demand single-job refresh, e.g. before opening a result view.
    #[instrument(skip(self))]
    pub async fn refresh_project(&self, id: &JobId) -> Result<()> {
        let job = self.require(id)?;
        let project_id = job
            .project_id
            .clone()
            .ok_or_else(|| JobError::NotLinked(id.to_string()))?;

        let snapshot = self.backend.get_project(&project_id).await?;
        if let Some(merged) = merge_snapshot(Some(&job), &snapshot) {
            self.store.upsert(merged).await;
        }
        Ok(())
    }

    /// Bulk refresh of the whole job list for the linked user.
    #[instrument(skip(self))]
    pub async fn refresh_all(&self) -> Result<usize> {
        let user_id = self.store.user_id().ok_or(JobError::NoUser)?;
        let snapshots = self.backend.get_projects(&user_id).await?;
        Ok(self.reconciler.apply(&snapshots).await)
    }

    /// Obtains a fresh signed playback URL immediately before playback.
    ///
    /// Only `ready` jobs are playable.
    #[instrument(skip(self))]
    pub async fn playback_url(&self, id: &JobId) -> Result<String> {
        let job = self.require(id)?;
        if job.status != JobStatus::Ready {
            return Err(JobError::NotReady(
                id.to_string(),
                job.status.as_str().to_string(),
            ));
        }
        let project_id = job
            .project_id
            .ok_or_else(|| JobError::NotLinked(id.to_string()))?;

        Ok(self.backend.fresh_video_url(&project_id).await?)
    }

    fn require(&self, id: &JobId) -> Result<Job> {
        self.store
            .get(id)
            .ok_or_else(|| JobError::JobNotFound(id.to_string()))
    }
}
