//! # Upload Queue
//!
//! Takes a batch of freshly-picked media files and gets each one uploaded
//! to backend storage independently, surfacing progress without blocking
//! on any single failure.
//!
//! ## Overview
//!
//! Items upload one at a time in array order (bounded concurrency of 1,
//! to bound backend load and keep multi-part response ordering
//! predictable). Every status transition is emitted on the event bus
//! before the next item begins. A failure on one item never halts the
//! rest of the batch; the batch is settled only when every item reaches a
//! terminal state.
//!
//! Two concurrently-started batches are independent queues and may
//! interleave their network calls; the queue holds no cross-batch state.

use crate::error::{Result, UploadError};
use crate::media::{MediaItem, UploadStatus};
use bridge_traits::backend::VideoBackend;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use bytes::Bytes;
use core_runtime::events::{CoreEvent, EventBus, UploadEvent};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Storage handle returned by the upload endpoint
#[derive(Debug, Deserialize)]
struct UploadReceipt {
    #[serde(rename = "storageId")]
    storage_id: String,
}

/// Sequential per-batch media uploader
pub struct UploadQueue {
    backend: Arc<dyn VideoBackend>,
    http_client: Arc<dyn HttpClient>,
    event_bus: Arc<EventBus>,
}

impl UploadQueue {
    pub fn new(
        backend: Arc<dyn VideoBackend>,
        http_client: Arc<dyn HttpClient>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            backend,
            http_client,
            event_bus,
        }
    }

    /// Uploads a batch of pending items sequentially and returns the
    /// settled batch.
    ///
    /// Every returned item is terminal (`uploaded` or `failed`); none
    /// remain `pending` or `uploading`.
    #[instrument(skip(self, items), fields(batch_size = items.len()))]
    pub async fn process(&self, mut items: Vec<MediaItem>) -> Vec<MediaItem> {
        let total = items.len();
        let mut uploaded = 0;
        let mut failed = 0;

        for item in items.iter_mut() {
            item.upload_status = UploadStatus::Uploading;
            self.emit_item(item);

            match self.upload_one(item).await {
                Ok(storage_id) => {
                    debug!(item_id = %item.id, storage_id = %storage_id, "Item uploaded");
                    item.upload_status = UploadStatus::Uploaded;
                    item.storage_id = Some(storage_id);
                    uploaded += 1;
                }
                Err(e) => {
                    // Sibling items keep uploading.
                    warn!(item_id = %item.id, error = %e, "Item upload failed");
                    item.upload_status = UploadStatus::Failed;
                    item.error = Some(e.to_string());
                    failed += 1;
                }
            }

            self.emit_item(item);
        }

        info!(total, uploaded, failed, "Upload batch settled");
        self.event_bus
            .emit(CoreEvent::Upload(UploadEvent::BatchSettled {
                total,
                uploaded,
                failed,
            }))
            .ok();

        items
    }

    /// One full item upload: obtain a signed slot, read the file, push
    /// the bytes, parse the storage receipt.
    async fn upload_one(&self, item: &MediaItem) -> Result<String> {
        let upload_url = self.backend.generate_upload_url().await?;

        let bytes = tokio::fs::read(&item.uri).await?;

        let request = HttpRequest::new(HttpMethod::Put, upload_url)
            .header("Content-Type", item.media_type.content_type())
            .body(Bytes::from(bytes));

        let response = self.http_client.execute(request).await?;
        if !response.is_success() {
            return Err(UploadError::Rejected {
                status: response.status,
                message: response.text().unwrap_or_default(),
            });
        }

        let receipt: UploadReceipt = response
            .json()
            .map_err(|e| UploadError::UnexpectedResponse(e.to_string()))?;

        Ok(receipt.storage_id)
    }

    fn emit_item(&self, item: &MediaItem) {
        self.event_bus
            .emit(CoreEvent::Upload(UploadEvent::ItemStatusChanged {
                item_id: item.id.as_str().to_string(),
                status: item.upload_status.as_str().to_string(),
                storage_id: item.storage_id.clone(),
            }))
            .ok();
    }
}
