//! # Core Configuration Module
//!
//! Provides configuration management for the Clip Platform Core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds all necessary dependencies and settings for the core
//! library. It enforces fail-fast validation so that missing bridges surface
//! at startup rather than mid-operation.
//!
//! ## Required Dependencies
//!
//! - `StateStore` - Required for durable client state (job list, user id,
//!   push token)
//!
//! ## Optional Dependencies
//!
//! - `HttpClient` - Backend HTTP operations; jobs cannot sync without one,
//!   but a draft-only offline session is still valid
//! - `PushBridge` - Push notification registration; absent on platforms with
//!   no push transport, where the core degrades to poll-only updates
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .api_base_url("https://api.example.com")
//!     .state_store(Arc::new(my_state_store))
//!     .http_client(Arc::new(my_http_client))
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! The builder validates required dependencies and returns actionable error
//! messages when capabilities are missing.

use crate::error::{Error, Result};
use bridge_traits::{HttpClient, PushBridge, StateStore};
use std::sync::Arc;
use std::time::Duration;

/// Default interval between poll cycles when jobs are in flight.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = crate::events::DEFAULT_EVENT_BUFFER_SIZE;

/// Core configuration for the Clip Platform Core.
///
/// Holds all dependencies and settings required to initialize the core
/// library. Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Base URL of the video generation backend
    pub api_base_url: String,

    /// Durable key-value state storage (required)
    pub state_store: Arc<dyn StateStore>,

    /// HTTP client for backend requests (optional)
    pub http_client: Option<Arc<dyn HttpClient>>,

    /// Push notification bridge (optional)
    pub push_bridge: Option<Arc<dyn PushBridge>>,

    /// Interval between poll cycles while jobs are in flight
    pub poll_interval: Duration,

    /// Capacity of the event bus broadcast channel
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("api_base_url", &self.api_base_url)
            .field("state_store", &"StateStore { ... }")
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .field(
                "push_bridge",
                &self.push_bridge.as_ref().map(|_| "PushBridge { ... }"),
            )
            .field("poll_interval", &self.poll_interval)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - API base URL is not empty and has an http(s) scheme
    /// - Poll interval is non-zero
    /// - Event buffer size is non-zero
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(Error::Config("API base URL cannot be empty".to_string()));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(Error::Config(format!(
                "API base URL must start with http:// or https://, got: {}",
                self.api_base_url
            )));
        }

        if self.poll_interval.is_zero() {
            return Err(Error::Config(
                "Poll interval must be greater than zero".to_string(),
            ));
        }

        if self.poll_interval > Duration::from_secs(3600) {
            return Err(Error::Config(
                "Poll interval exceeds maximum of 1 hour".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the HTTP client, or a capability error if none was injected.
    pub fn require_http_client(&self) -> Result<Arc<dyn HttpClient>> {
        self.http_client
            .clone()
            .ok_or_else(|| Error::CapabilityMissing {
                capability: "HttpClient".to_string(),
                message: "HttpClient implementation is required for backend sync. \
                          Desktop: inject ReqwestHttpClient from bridge-desktop. \
                          Mobile: inject a platform-native HTTP stack."
                    .to_string(),
            })
    }

    /// Returns the push bridge, or a capability error if none was injected.
    pub fn require_push_bridge(&self) -> Result<Arc<dyn PushBridge>> {
        self.push_bridge
            .clone()
            .ok_or_else(|| Error::CapabilityMissing {
                capability: "PushBridge".to_string(),
                message: "PushBridge implementation is required for push registration. \
                          Desktop: inject UnsupportedPushBridge from bridge-desktop \
                          to degrade gracefully. Mobile: inject APNs/FCM bridges."
                    .to_string(),
            })
    }
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Use this builder to incrementally set configuration options and then
/// call [`build()`](CoreConfigBuilder::build) to create the final config.
#[derive(Default)]
pub struct CoreConfigBuilder {
    api_base_url: Option<String>,
    state_store: Option<Arc<dyn StateStore>>,
    http_client: Option<Arc<dyn HttpClient>>,
    push_bridge: Option<Arc<dyn PushBridge>>,
    poll_interval: Option<Duration>,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the backend API base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Sets the state store implementation (required).
    ///
    /// The state store persists the job list, linked user id and push token
    /// across launches.
    pub fn state_store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.state_store = Some(store);
        self
    }

    /// Sets the HTTP client implementation (optional).
    ///
    /// Without one, backend-facing operations fail with a capability error
    /// while local draft management keeps working.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the push bridge implementation (optional).
    pub fn push_bridge(mut self, bridge: Arc<dyn PushBridge>) -> Self {
        self.push_bridge = Some(bridge);
        self
    }

    /// Sets the interval between poll cycles.
    ///
    /// Default: 5 seconds.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Sets the event bus buffer size.
    ///
    /// Default: 100.
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// Returns `Ok(CoreConfig)` on success, or an error if:
    /// - The state store is missing
    /// - Configuration values are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let api_base_url = self.api_base_url.ok_or_else(|| {
            Error::Config("API base URL is required. Use .api_base_url() to set it.".to_string())
        })?;

        let state_store = self.state_store.ok_or_else(|| Error::CapabilityMissing {
            capability: "StateStore".to_string(),
            message: "StateStore implementation is required for client state persistence. \
                      Desktop: inject SqliteStateStore from bridge-desktop. \
                      Mobile: inject platform-native storage."
                .to_string(),
        })?;

        let config = CoreConfig {
            api_base_url,
            state_store,
            http_client: self.http_client,
            push_bridge: self.push_bridge,
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}
