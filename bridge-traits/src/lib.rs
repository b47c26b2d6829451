//! # Host Bridge Traits
//!
//! Platform and backend abstraction traits that must be implemented by
//! each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the client core and
//! platform-specific implementations. Each trait represents a capability
//! that the core requires but that must be implemented differently per
//! platform (desktop, iOS, Android, web) or per backend deployment.
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Send-once HTTP transport (TLS, pooling)
//! - [`VideoBackend`](backend::VideoBackend) - Remote video generation API surface
//!
//! ### Storage
//! - [`StateStore`](storage::StateStore) - Durable key-value storage for client state
//!
//! ### Platform Integration
//! - [`PushBridge`](push::PushBridge) - OS push notification registration
//!
//! ## Fail-Fast Strategy
//!
//! The core fails fast with descriptive errors when a required capability
//! is missing:
//!
//! ```ignore
//! let http_client = config.http_client
//!     .ok_or_else(|| Error::CapabilityMissing {
//!         capability: "HttpClient".to_string(),
//!         message: "No HTTP client provided. \
//!                  Desktop: ensure default feature is enabled. \
//!                  Mobile: inject platform-native adapter.".to_string()
//!     })?;
//! ```
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Platform
//! implementations should convert platform-specific errors to
//! `BridgeError` and provide actionable messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe
//! concurrent usage across async tasks.

pub mod backend;
pub mod error;
pub mod http;
pub mod push;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use backend::{ProjectSnapshot, ProjectStatus, RegenerateOutcome, VideoBackend};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use push::{PushBridge, PushPermission};
pub use storage::StateStore;
