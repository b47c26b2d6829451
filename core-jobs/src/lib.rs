//! # Job Tracking Core
//!
//! Client-side job tracking and state reconciliation for video
//! generation:
//! - [`JobStore`] - authoritative, persisted local job list
//! - [`Reconciler`] - rank-ordered merge of backend snapshots
//! - [`Poller`] - periodic refresh of in-flight jobs
//! - [`ProjectService`] - user-action entry points (create, submit,
//!   regenerate, delete, playback)
//!
//! ## Overview
//!
//! UI actions create and patch store entries optimistically, backend
//! mutations are issued, the poller periodically re-fetches, and the
//! reconciler merges results back in under the no-regression rule. The
//! UI re-renders from the store via its event bus.

pub mod error;
pub mod job;
pub mod poller;
pub mod reconciler;
pub mod service;
pub mod store;

pub use error::{JobError, Result};
pub use job::{Job, JobId, JobStatus, JobStatusExt};
pub use poller::{Poller, PollerHandle};
pub use reconciler::{merge_snapshot, should_apply, Reconciler};
pub use service::ProjectService;
pub use store::JobStore;
