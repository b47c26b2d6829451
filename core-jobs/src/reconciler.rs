//! # Reconciler
//!
//! Merges backend-provided job snapshots into the job store without
//! destroying in-progress optimistic state.
//!
//! ## Overview
//!
//! Backend polls and push-driven refreshes can race: an older fetch
//! response may arrive after a newer one, or after a local optimistic
//! transition. The rank-based merge rule prevents visible "flicker" from
//! ready back to processing:
//!
//! - A snapshot applies when its status outranks the local status.
//! - At equal rank it applies only when the statuses are identical
//!   (idempotent content refresh) or the snapshot reports `failed`
//!   (failure must always be able to surface over pending/processing).
//! - A `ready` job never regresses; a `failed` job is never resurrected
//!   to `processing` by a stale snapshot.
//!
//! Fields the snapshot omits are preserved from local knowledge; fields
//! it carries win. The local id and creation time always survive a merge.
//!
//! The merge rule is a pure function ([`should_apply`], [`merge_snapshot`])
//! so the regression properties are unit-testable without a store.

use crate::job::{Job, JobId, JobStatus, JobStatusExt};
use crate::store::JobStore;
use bridge_traits::backend::ProjectSnapshot;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Decides whether a snapshot status may replace the local status.
pub fn should_apply(local: JobStatus, snapshot: JobStatus) -> bool {
    if snapshot.rank() > local.rank() {
        return true;
    }
    if snapshot.rank() == local.rank() {
        // Identical statuses refresh content; failed surfaces over its
        // rank-2 sibling but never the other way around.
        return snapshot == local || snapshot == JobStatus::Failed;
    }
    false
}

/// Merges one snapshot against an optional local job.
///
/// Returns the job to upsert, or `None` when the snapshot is stale and
/// must be ignored entirely (including its content fields).
pub fn merge_snapshot(local: Option<&Job>, snapshot: &ProjectSnapshot) -> Option<Job> {
    let Some(local) = local else {
        return Some(Job::from_snapshot(snapshot));
    };

    if !should_apply(local.status, snapshot.status) {
        return None;
    }

    Some(Job {
        id: local.id.clone(),
        project_id: Some(snapshot.id.clone()),
        status: snapshot.status,
        uri: snapshot.video_url.clone().or_else(|| local.uri.clone()),
        prompt: snapshot.prompt.clone().or_else(|| local.prompt.clone()),
        script: snapshot.script.clone().or_else(|| local.script.clone()),
        thumbnail_url: snapshot
            .thumbnail_url
            .clone()
            .or_else(|| local.thumbnail_url.clone()),
        created_at: local.created_at,
        error: snapshot.error.clone().or_else(|| {
            if snapshot.status == JobStatus::Failed {
                local.error.clone()
            } else {
                None
            }
        }),
    })
}

/// Applies batches of backend snapshots to the job store
pub struct Reconciler {
    store: Arc<JobStore>,
}

impl Reconciler {
    pub fn new(store: Arc<JobStore>) -> Self {
        Self { store }
    }

    /// Merges a batch of snapshots, keyed by backend project id.
    ///
    /// Returns the number of store mutations performed. Stale snapshots
    /// are dropped silently; callers never observe an error from a merge.
    #[instrument(skip(self, snapshots), fields(count = snapshots.len()))]
    pub async fn apply(&self, snapshots: &[ProjectSnapshot]) -> usize {
        let mut applied = 0;

        for snapshot in snapshots {
            let local = self
                .store
                .find_by_project_id(&snapshot.id)
                .or_else(|| self.store.get(&JobId::new(snapshot.id.clone())));

            match merge_snapshot(local.as_ref(), snapshot) {
                Some(merged) => {
                    self.store.upsert(merged).await;
                    applied += 1;
                }
                None => {
                    debug!(project_id = %snapshot.id, status = %snapshot.status, "Ignoring stale snapshot");
                }
            }
        }

        applied
    }
}
