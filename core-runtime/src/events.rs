//! # Event Bus System
//!
//! Provides an event-driven architecture for the client core using
//! `tokio::sync::broadcast`. This module enables decoupled communication
//! between core modules and the UI through typed events.
//!
//! ## Overview
//!
//! - **Event Types**: Strongly-typed enum hierarchies for each domain
//! - **EventBus**: Central broadcast channel for publishing events
//! - **Subscription Management**: Multiple subscribers listen independently
//!
//! Every job store mutation, upload status transition and push
//! registration outcome is published here; screens subscribe and
//! re-render from the store.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, CoreEvent, JobEvent};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Job(JobEvent::Removed {
//!         job_id: "j1".to_string(),
//!     }))
//!     .ok();
//!
//! let event = stream.recv().await.unwrap();
//! assert!(matches!(event, CoreEvent::Job(JobEvent::Removed { .. })));
//! # }
//! ```
//!
//! ## Error Handling
//!
//! `tokio::sync::broadcast` produces two receive errors:
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events. This is
//!   non-fatal; the subscriber keeps receiving new events.
//! - **`RecvError::Closed`**: all senders dropped, i.e. shutdown.
//!
//! Emitting with zero subscribers returns an error from the channel;
//! publishers treat that as a no-op (`.ok()`), never as a failure.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that can't keep up will receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Job store mutations
    Job(JobEvent),
    /// Media upload progress
    Upload(UploadEvent),
    /// Push notification registration
    Push(PushEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Job(e) => e.description(),
            CoreEvent::Upload(e) => e.description(),
            CoreEvent::Push(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Job(JobEvent::Upserted { status, .. }) if status == "failed" => {
                EventSeverity::Error
            }
            CoreEvent::Upload(UploadEvent::ItemStatusChanged { status, .. })
                if status == "failed" =>
            {
                EventSeverity::Warning
            }
            CoreEvent::Job(JobEvent::Upserted { status, .. }) if status == "ready" => {
                EventSeverity::Info
            }
            CoreEvent::Push(PushEvent::Registered { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Job Events
// ============================================================================

/// Events emitted by the job store on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum JobEvent {
    /// A job was inserted or replaced.
    Upserted {
        /// The job id.
        job_id: String,
        /// The job's status after the mutation (lowercase string).
        status: String,
    },
    /// A job was removed locally.
    Removed {
        /// The job id that was removed.
        job_id: String,
    },
    /// The persisted job list was reloaded at startup.
    Loaded {
        /// Number of jobs restored.
        count: usize,
    },
}

impl JobEvent {
    fn description(&self) -> &str {
        match self {
            JobEvent::Upserted { .. } => "Job upserted",
            JobEvent::Removed { .. } => "Job removed",
            JobEvent::Loaded { .. } => "Job list loaded",
        }
    }
}

// ============================================================================
// Upload Events
// ============================================================================

/// Events emitted by the upload queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum UploadEvent {
    /// A media item changed upload status. Emitted before the next item
    /// in the batch begins.
    ItemStatusChanged {
        /// The media item id.
        item_id: String,
        /// New upload status (lowercase string).
        status: String,
        /// Backend storage handle, present once uploaded.
        storage_id: Option<String>,
    },
    /// Every item of a batch reached a terminal state.
    BatchSettled {
        /// Total items in the batch.
        total: usize,
        /// Items that uploaded successfully.
        uploaded: usize,
        /// Items that failed.
        failed: usize,
    },
}

impl UploadEvent {
    fn description(&self) -> &str {
        match self {
            UploadEvent::ItemStatusChanged { .. } => "Upload item status changed",
            UploadEvent::BatchSettled { .. } => "Upload batch settled",
        }
    }
}

// ============================================================================
// Push Events
// ============================================================================

/// Events related to push notification registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PushEvent {
    /// Device token obtained and handed to the backend.
    Registered {
        /// The user the token was registered for.
        user_id: String,
    },
    /// Permission denied; updates degrade to poll-only.
    Denied,
}

impl PushEvent {
    fn description(&self) -> &str {
        match self {
            PushEvent::Registered { .. } => "Push token registered",
            PushEvent::Denied => "Push permission denied",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus backed by a `tokio::sync::broadcast` channel.
///
/// Fully thread-safe (`Send + Sync`); share across tasks with `Arc`.
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error when there are none. Delivery is synchronous with respect to
    /// the publisher: the event is in every subscriber's buffer before
    /// this call returns.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        tracing::trace!(event = ?event, "Emitting event");
        self.sender.send(event)
    }

    /// Creates a new subscription to the event stream.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emit(CoreEvent::Job(JobEvent::Upserted {
            job_id: "j1".to_string(),
            status: "processing".to_string(),
        }))
        .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            CoreEvent::Job(JobEvent::Upserted {
                job_id: "j1".to_string(),
                status: "processing".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_is_err() {
        let bus = EventBus::new(16);
        let result = bus.emit(CoreEvent::Push(PushEvent::Denied));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_independently() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(CoreEvent::Upload(UploadEvent::BatchSettled {
            total: 3,
            uploaded: 2,
            failed: 1,
        }))
        .unwrap();

        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }

    #[test]
    fn test_severity_mapping() {
        let failed = CoreEvent::Job(JobEvent::Upserted {
            job_id: "j1".to_string(),
            status: "failed".to_string(),
        });
        assert_eq!(failed.severity(), EventSeverity::Error);

        let ready = CoreEvent::Job(JobEvent::Upserted {
            job_id: "j1".to_string(),
            status: "ready".to_string(),
        });
        assert_eq!(ready.severity(), EventSeverity::Info);

        assert_eq!(
            CoreEvent::Push(PushEvent::Denied).severity(),
            EventSeverity::Debug
        );
    }

    #[test]
    fn test_event_serialization() {
        let event = CoreEvent::Job(JobEvent::Removed {
            job_id: "j1".to_string(),
        });
        let json = serde_json::to_string(&event).unwrap();
        let back: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
