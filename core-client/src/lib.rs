//! Core client façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (state store,
//! HTTP client, push bridge) into the shared Rust core. Desktop apps
//! inject the adapters from `bridge-desktop`; mobile hosts inject their
//! platform-native equivalents.
//!
//! ## Overview
//!
//! [`ClipCore::initialize`] consumes a [`CoreConfig`] and assembles the
//! event bus, job store and reconciler, plus the backend-facing
//! services whenever an HTTP client was injected. [`start`] loads
//! persisted state and spawns the poller; [`shutdown`] stops it and
//! waits for the loop to exit.
//!
//! Capabilities stay optional past the required state store: a config
//! without an HTTP client still yields a working draft-only core, and
//! the backend-facing accessors report the missing capability instead
//! of failing mid-operation.
//!
//! [`start`]: ClipCore::start
//! [`shutdown`]: ClipCore::shutdown

pub mod error;

pub use error::{CoreError, Result};

use bridge_traits::backend::VideoBackend;
use core_jobs::{JobStore, Poller, PollerHandle, ProjectService, Reconciler};
use core_notify::Notifier;
use core_runtime::config::CoreConfig;
use core_runtime::events::EventBus;
use core_upload::UploadQueue;
use provider_http::HttpVideoBackend;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

/// Primary façade exposed to host applications.
pub struct ClipCore {
    config: CoreConfig,
    event_bus: Arc<EventBus>,
    store: Arc<JobStore>,
    reconciler: Arc<Reconciler>,
    backend: Option<Arc<dyn VideoBackend>>,
    projects: Option<Arc<ProjectService>>,
    uploads: Option<Arc<UploadQueue>>,
    notifier: Option<Arc<Notifier>>,
    poller: Mutex<Option<PollerHandle>>,
}

impl ClipCore {
    /// Assembles the core from a configuration.
    ///
    /// The store, reconciler and event bus are always built. The
    /// project service and upload queue additionally need the config's
    /// HTTP client; the notifier needs the push bridge as well. Absent
    /// capabilities leave those services unassembled rather than
    /// failing the whole core.
    #[instrument(skip(config))]
    pub fn initialize(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        let event_bus = Arc::new(EventBus::new(config.event_buffer_size));
        let store = Arc::new(JobStore::new(
            Arc::clone(&config.state_store),
            Arc::clone(&event_bus),
        ));
        let reconciler = Arc::new(Reconciler::new(Arc::clone(&store)));

        let backend: Option<Arc<dyn VideoBackend>> = config.http_client.clone().map(|http| {
            Arc::new(HttpVideoBackend::new(http, &config.api_base_url))
                as Arc<dyn VideoBackend>
        });

        let projects = backend.clone().map(|backend| {
            Arc::new(ProjectService::new(
                Arc::clone(&store),
                backend,
                Arc::clone(&reconciler),
            ))
        });

        let uploads = match (&backend, &config.http_client) {
            (Some(backend), Some(http)) => Some(Arc::new(UploadQueue::new(
                Arc::clone(backend),
                Arc::clone(http),
                Arc::clone(&event_bus),
            ))),
            _ => None,
        };

        let notifier = match (&backend, &config.push_bridge) {
            (Some(backend), Some(push)) => Some(Arc::new(Notifier::new(
                Arc::clone(push),
                Arc::clone(backend),
                Arc::clone(&config.state_store),
                Arc::clone(&event_bus),
            ))),
            _ => None,
        };

        info!(
            online = backend.is_some(),
            push = notifier.is_some(),
            "Core assembled"
        );

        Ok(Self {
            config,
            event_bus,
            store,
            reconciler,
            backend,
            projects,
            uploads,
            notifier,
            poller: Mutex::new(None),
        })
    }

    /// Loads persisted jobs and spawns the poller.
    ///
    /// Returns the number of jobs restored from the state store. With
    /// no HTTP client the core stays draft-only and no poller runs.
    /// Calling `start` again while the poller is running is a no-op
    /// apart from re-reading persisted state.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<usize> {
        let loaded = self.store.load().await?;

        if let Some(backend) = &self.backend {
            let mut running = self.poller_slot();
            if running.is_none() {
                *running = Some(Poller::spawn(
                    Arc::clone(backend),
                    Arc::clone(&self.store),
                    Arc::clone(&self.reconciler),
                    self.config.poll_interval,
                ));
            }
            drop(running);
        }

        info!(loaded, polling = self.is_polling(), "Core started");
        Ok(loaded)
    }

    /// Stops the poller and waits for its loop to exit.
    ///
    /// Safe to call when the core never started or already shut down.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        let handle = self.poller_slot().take();
        if let Some(handle) = handle {
            handle.stop().await;
            info!("Core shut down");
        }
    }

    /// Whether a poller task is currently held by the core.
    pub fn is_polling(&self) -> bool {
        self.poller_slot().is_some()
    }

    /// Event bus carrying job, upload and push events.
    pub fn events(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    /// The authoritative local job list.
    pub fn store(&self) -> Arc<JobStore> {
        Arc::clone(&self.store)
    }

    /// User-action entry points; needs an HTTP client.
    pub fn projects(&self) -> Result<Arc<ProjectService>> {
        self.projects.clone().ok_or_else(Self::missing_http)
    }

    /// Media upload queue; needs an HTTP client.
    pub fn uploads(&self) -> Result<Arc<UploadQueue>> {
        self.uploads.clone().ok_or_else(Self::missing_http)
    }

    /// Push registration entry point; needs a push bridge and an HTTP
    /// client.
    pub fn notifier(&self) -> Result<Arc<Notifier>> {
        self.notifier.clone().ok_or_else(|| {
            if self.config.push_bridge.is_none() {
                CoreError::CapabilityMissing {
                    capability: "PushBridge".to_string(),
                    message: "push registration needs an injected push bridge".to_string(),
                }
            } else {
                Self::missing_http()
            }
        })
    }

    /// Registers the device for push notifications once per install.
    pub async fn register_for_push(&self, user_id: &str) -> Result<Option<String>> {
        let notifier = self.notifier()?;
        Ok(notifier.register_for_push(user_id).await?)
    }

    fn missing_http() -> CoreError {
        CoreError::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: "backend services need an injected HTTP client".to_string(),
        }
    }

    fn poller_slot(&self) -> std::sync::MutexGuard<'_, Option<PollerHandle>> {
        self.poller.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
