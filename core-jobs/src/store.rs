//! # Job Store
//!
//! Authoritative local list of jobs, exposed as an ordered, reactive
//! collection.
//!
//! ## Overview
//!
//! The store is the single source of truth for the UI and the only shared
//! mutable resource in the core. All mutations go through [`upsert`] and
//! [`remove`]; an interior `RwLock` serializes access so the single-writer
//! guarantees hold on a multi-threaded runtime. Every mutation notifies
//! event bus subscribers synchronously before the call returns, then
//! writes the full job list through to the durable state store.
//!
//! The store itself is regression-agnostic: `upsert` is a full replace.
//! Regression protection lives in the [`Reconciler`](crate::reconciler),
//! which decides *whether* to call `upsert` at all.
//!
//! Persistence failures are absorbed with a warning; the in-memory state
//! stays correct and the next mutation retries the write-through.
//!
//! [`upsert`]: JobStore::upsert
//! [`remove`]: JobStore::remove

use crate::error::{JobError, Result};
use crate::job::{Job, JobId, JobStatusExt};
use bridge_traits::storage::{keys, StateStore};
use core_runtime::events::{CoreEvent, EventBus, JobEvent};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

struct StoredJob {
    job: Job,
    /// Insertion sequence, used to break `created_at` ties
    seq: u64,
}

#[derive(Default)]
struct StoreInner {
    jobs: HashMap<String, StoredJob>,
    user_id: Option<String>,
    next_seq: u64,
}

/// Authoritative local job list with write-through persistence
pub struct JobStore {
    inner: RwLock<StoreInner>,
    state_store: Arc<dyn StateStore>,
    event_bus: Arc<EventBus>,
    /// Serializes write-throughs so an older snapshot can never land
    /// after a newer one
    persist_lock: tokio::sync::Mutex<()>,
}

impl JobStore {
    pub fn new(state_store: Arc<dyn StateStore>, event_bus: Arc<EventBus>) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            state_store,
            event_bus,
            persist_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Restores the persisted job list and user id.
    ///
    /// Call once at startup, before spawning the poller. Returns the
    /// number of jobs restored.
    pub async fn load(&self) -> Result<usize> {
        let raw_jobs = self
            .state_store
            .get(keys::JOBS)
            .await
            .map_err(|e| JobError::Persistence(e.to_string()))?;
        let raw_user = self
            .state_store
            .get(keys::USER_ID)
            .await
            .map_err(|e| JobError::Persistence(e.to_string()))?;

        let jobs: Vec<Job> = match raw_jobs {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };

        let count = jobs.len();
        {
            let mut inner = self.write_lock();
            inner.jobs.clear();
            inner.next_seq = 0;
            for job in jobs {
                let seq = inner.next_seq;
                inner.next_seq += 1;
                inner.jobs.insert(job.id.as_str().to_string(), StoredJob { job, seq });
            }
            inner.user_id = raw_user;
        }

        info!(count, "Restored persisted job list");
        self.event_bus
            .emit(CoreEvent::Job(JobEvent::Loaded { count }))
            .ok();

        Ok(count)
    }

    /// Inserts or fully replaces a job record.
    ///
    /// Subscribers are notified before this call returns.
    pub async fn upsert(&self, job: Job) {
        let event = CoreEvent::Job(JobEvent::Upserted {
            job_id: job.id.as_str().to_string(),
            status: job.status.as_str().to_string(),
        });

        {
            let mut inner = self.write_lock();
            match inner.jobs.get_mut(job.id.as_str()) {
                Some(stored) => {
                    debug!(job_id = %job.id, status = %job.status, "Replacing job");
                    stored.job = job;
                }
                None => {
                    debug!(job_id = %job.id, status = %job.status, "Inserting job");
                    let seq = inner.next_seq;
                    inner.next_seq += 1;
                    inner
                        .jobs
                        .insert(job.id.as_str().to_string(), StoredJob { job, seq });
                }
            }
        }

        self.event_bus.emit(event).ok();
        self.persist().await;
    }

    /// Deletes a job locally. Returns whether the job existed.
    ///
    /// Callers must already have confirmed (or deliberately skipped) the
    /// corresponding backend deletion; the store performs no network
    /// calls itself.
    pub async fn remove(&self, id: &JobId) -> bool {
        let existed = {
            let mut inner = self.write_lock();
            inner.jobs.remove(id.as_str()).is_some()
        };

        if existed {
            self.event_bus
                .emit(CoreEvent::Job(JobEvent::Removed {
                    job_id: id.as_str().to_string(),
                }))
                .ok();
            self.persist().await;
        }

        existed
    }

    /// Snapshot of all jobs ordered by `created_at` descending, ties
    /// broken by insertion order.
    pub fn list(&self) -> Vec<Job> {
        let inner = self.read_lock();
        let mut entries: Vec<&StoredJob> = inner.jobs.values().collect();
        entries.sort_by(|a, b| {
            b.job
                .created_at
                .cmp(&a.job.created_at)
                .then(a.seq.cmp(&b.seq))
        });
        entries.into_iter().map(|s| s.job.clone()).collect()
    }

    pub fn get(&self, id: &JobId) -> Option<Job> {
        self.read_lock().jobs.get(id.as_str()).map(|s| s.job.clone())
    }

    /// Looks a job up by its backend correlation key.
    pub fn find_by_project_id(&self, project_id: &str) -> Option<Job> {
        self.read_lock()
            .jobs
            .values()
            .find(|s| s.job.project_id.as_deref() == Some(project_id))
            .map(|s| s.job.clone())
    }

    /// True while any job is pending or processing. Drives the poller's
    /// idle/active decision.
    pub fn has_in_flight(&self) -> bool {
        self.read_lock()
            .jobs
            .values()
            .any(|s| s.job.status.is_in_flight())
    }

    pub fn user_id(&self) -> Option<String> {
        self.read_lock().user_id.clone()
    }

    /// Links the active user and persists the association.
    pub async fn set_user_id(&self, user_id: impl Into<String>) -> Result<()> {
        let user_id = user_id.into();
        {
            let mut inner = self.write_lock();
            inner.user_id = Some(user_id.clone());
        }
        self.state_store
            .set(keys::USER_ID, &user_id)
            .await
            .map_err(|e| JobError::Persistence(e.to_string()))?;
        Ok(())
    }

    /// Event bus carrying store mutation notifications.
    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    /// Writes the full job list through to durable storage.
    ///
    /// Failures are logged and swallowed; in-memory state is already
    /// correct and the next mutation retries. Concurrent mutations
    /// (poller subtask vs. a user action) queue on the persist lock, so
    /// the snapshot written last is always the newest one.
    async fn persist(&self) {
        let _write_turn = self.persist_lock.lock().await;

        let snapshot = {
            let inner = self.read_lock();
            let mut entries: Vec<&StoredJob> = inner.jobs.values().collect();
            entries.sort_by_key(|s| s.seq);
            entries.into_iter().map(|s| s.job.clone()).collect::<Vec<_>>()
        };

        let json = match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize job list");
                return;
            }
        };

        if let Err(e) = self.state_store.set(keys::JOBS, &json).await {
            warn!(error = %e, "Failed to persist job list");
        }
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobStatus;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use std::collections::HashMap as StdHashMap;
    use std::sync::Mutex;

    struct MemoryStateStore {
        values: Mutex<StdHashMap<String, String>>,
    }

    impl MemoryStateStore {
        fn new() -> Self {
            Self {
                values: Mutex::new(StdHashMap::new()),
            }
        }
    }

    #[async_trait]
    impl StateStore for MemoryStateStore {
        async fn set(&self, key: &str, value: &str) -> BridgeResult<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn get(&self, key: &str) -> BridgeResult<Option<String>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn delete(&self, key: &str) -> BridgeResult<()> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }

        async fn list_keys(&self) -> BridgeResult<Vec<String>> {
            Ok(self.values.lock().unwrap().keys().cloned().collect())
        }
    }

    fn new_store() -> (JobStore, Arc<MemoryStateStore>) {
        let state = Arc::new(MemoryStateStore::new());
        let bus = Arc::new(EventBus::new(32));
        (JobStore::new(state.clone(), bus), state)
    }

    fn job_with(id: &str, status: JobStatus, created_at: i64) -> Job {
        Job {
            id: JobId::new(id),
            project_id: Some(id.to_string()),
            status,
            uri: None,
            prompt: None,
            script: None,
            thumbnail_url: None,
            created_at,
            error: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let (store, _) = new_store();
        let job = job_with("p1", JobStatus::Processing, 100);

        store.upsert(job.clone()).await;
        store.upsert(job.clone()).await;

        let listed = store.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id.as_str(), "p1");
    }

    #[tokio::test]
    async fn test_list_orders_by_created_at_desc_with_insertion_ties() {
        let (store, _) = new_store();
        store.upsert(job_with("old", JobStatus::Ready, 100)).await;
        store.upsert(job_with("tie-a", JobStatus::Ready, 200)).await;
        store.upsert(job_with("tie-b", JobStatus::Ready, 200)).await;
        store.upsert(job_with("new", JobStatus::Ready, 300)).await;

        let jobs = store.list();
        let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "tie-a", "tie-b", "old"]);
    }

    #[tokio::test]
    async fn test_remove_reports_existence() {
        let (store, _) = new_store();
        store.upsert(job_with("p1", JobStatus::Draft, 1)).await;

        assert!(store.remove(&JobId::new("p1")).await);
        assert!(!store.remove(&JobId::new("p1")).await);
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn test_has_in_flight() {
        let (store, _) = new_store();
        assert!(!store.has_in_flight());

        store.upsert(job_with("p1", JobStatus::Ready, 1)).await;
        assert!(!store.has_in_flight());

        store.upsert(job_with("p2", JobStatus::Processing, 2)).await;
        assert!(store.has_in_flight());
    }

    #[tokio::test]
    async fn test_mutation_notifies_before_returning() {
        let (store, _) = new_store();
        let mut rx = store.event_bus().subscribe();

        store.upsert(job_with("p1", JobStatus::Pending, 1)).await;

        // The event must already be buffered; try_recv does not wait.
        let event = rx.try_recv().unwrap();
        assert_eq!(
            event,
            CoreEvent::Job(JobEvent::Upserted {
                job_id: "p1".to_string(),
                status: "pending".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_persistence_round_trip() {
        let state = Arc::new(MemoryStateStore::new());
        let bus = Arc::new(EventBus::new(32));

        {
            let store = JobStore::new(state.clone(), bus.clone());
            store.upsert(job_with("p1", JobStatus::Ready, 100)).await;
            store.upsert(job_with("p2", JobStatus::Processing, 200)).await;
            store.set_user_id("user-1").await.unwrap();
        }

        let restored = JobStore::new(state, Arc::new(EventBus::new(32)));
        let count = restored.load().await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(restored.user_id().as_deref(), Some("user-1"));
        let jobs = restored.list();
        let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_mutations_persist_complete_state() {
        let state = Arc::new(MemoryStateStore::new());
        let store = Arc::new(JobStore::new(state.clone(), Arc::new(EventBus::new(64))));

        let mut tasks = Vec::new();
        for i in 0..16i64 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store
                    .upsert(job_with(&format!("p{}", i), JobStatus::Processing, i))
                    .await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // The last write-through must reflect every completed mutation.
        let json = state.get(keys::JOBS).await.unwrap().unwrap();
        let persisted: Vec<Job> = serde_json::from_str(&json).unwrap();
        assert_eq!(persisted.len(), 16);
    }

    #[tokio::test]
    async fn test_find_by_project_id() {
        let (store, _) = new_store();
        let mut draft = Job::draft("a prompt");
        draft.project_id = Some("backend-1".to_string());
        let local_id = draft.id.clone();
        store.upsert(draft).await;

        let found = store.find_by_project_id("backend-1").unwrap();
        assert_eq!(found.id, local_id);
        assert!(store.find_by_project_id("unknown").is_none());
    }
}
