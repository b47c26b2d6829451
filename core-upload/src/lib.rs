//! # Media Upload Core
//!
//! Per-batch media upload with independent per-item lifecycles:
//! - [`MediaItem`] - one picked file and its upload state machine
//! - [`UploadQueue`] - sequential uploader with settle-all semantics
//!
//! Items feed the `storage_id` they earn into subsequent backend
//! mutations; nothing here is persisted across sessions.

pub mod error;
pub mod media;
pub mod queue;

pub use error::{Result, UploadError};
pub use media::{MediaItem, MediaItemId, MediaType, UploadStatus};
pub use queue::UploadQueue;
