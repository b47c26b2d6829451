//! # Notifier
//!
//! Registers the device for push notifications once per install and hands
//! the resulting token to the backend, so a finished backend job can
//! reach the client even while the poller is idle.
//!
//! Permission denial is not an error: the core degrades gracefully to
//! poll-only updates.

use crate::error::Result;
use bridge_traits::backend::VideoBackend;
use bridge_traits::push::{PushBridge, PushPermission};
use bridge_traits::storage::{keys, StateStore};
use core_runtime::events::{CoreEvent, EventBus, PushEvent};
use core_runtime::logging::redact_if_sensitive;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Push registration entry point
pub struct Notifier {
    push_bridge: Arc<dyn PushBridge>,
    backend: Arc<dyn VideoBackend>,
    state_store: Arc<dyn StateStore>,
    event_bus: Arc<EventBus>,
}

impl Notifier {
    pub fn new(
        push_bridge: Arc<dyn PushBridge>,
        backend: Arc<dyn VideoBackend>,
        state_store: Arc<dyn StateStore>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            push_bridge,
            backend,
            state_store,
            event_bus,
        }
    }

    /// Requests OS-level permission once, obtains a device token and
    /// registers it with the backend.
    ///
    /// Returns `Ok(Some(token))` when the device is registered (or was
    /// already registered during a previous launch), `Ok(None)` when
    /// permission is denied. Denial degrades the app to poll-only
    /// updates; it is not a fatal error.
    #[instrument(skip(self))]
    pub async fn register_for_push(&self, user_id: &str) -> Result<Option<String>> {
        // Once per install: a persisted token means registration already
        // succeeded during a previous launch.
        if let Some(token) = self.state_store.get(keys::PUSH_TOKEN).await? {
            debug!("Push token already registered");
            return Ok(Some(token));
        }

        match self.push_bridge.request_permission().await? {
            PushPermission::Denied => {
                info!("Push permission denied, degrading to poll-only updates");
                self.event_bus
                    .emit(CoreEvent::Push(PushEvent::Denied))
                    .ok();
                Ok(None)
            }
            PushPermission::Granted => {
                let token = self.push_bridge.device_token().await?;
                debug!(
                    token = %redact_if_sensitive("device_token", &token),
                    "Obtained device push token"
                );
                self.backend.register_push_token(user_id, &token).await?;
                self.state_store.set(keys::PUSH_TOKEN, &token).await?;

                info!("Push token registered");
                self.event_bus
                    .emit(CoreEvent::Push(PushEvent::Registered {
                        user_id: user_id.to_string(),
                    }))
                    .ok();
                Ok(Some(token))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::backend::{ProjectSnapshot, ProjectStatus, RegenerateOutcome};
    use bridge_traits::error::Result as BridgeResult;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MemoryStateStore {
        values: Mutex<HashMap<String, String>>,
    }

    impl MemoryStateStore {
        fn new() -> Self {
            Self {
                values: Mutex::new(HashMap::new()),
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

    struct FixedPushBridge {
        permission: PushPermission,
        permission_requests: AtomicUsize,
    }

    impl FixedPushBridge {
        fn new(permission: PushPermission) -> Self {
            Self {
                permission,
                permission_requests: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PushBridge for FixedPushBridge {
        async fn request_permission(&self) -> BridgeResult<PushPermission> {
            self.permission_requests.fetch_add(1, Ordering::SeqCst);
            Ok(self.permission)
        }

        async fn device_token(&self) -> BridgeResult<String> {
            Ok("device-token-1".to_string())
        }
    }

    #[derive(Default)]
    struct RecordingBackend {
        registered: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl VideoBackend for RecordingBackend {
        async fn get_projects(&self, _user_id: &str) -> BridgeResult<Vec<ProjectSnapshot>> {
            Ok(Vec::new())
        }

        async fn get_project(&self, project_id: &str) -> BridgeResult<ProjectSnapshot> {
            Ok(ProjectSnapshot::new(project_id, ProjectStatus::Processing))
        }

        async fn delete_project(&self, _project_id: &str) -> BridgeResult<()> {
            Ok(())
        }

        async fn mark_project_submitted(&self, _project_id: &str) -> BridgeResult<()> {
            Ok(())
        }

        async fn regenerate_project_editing(
            &self,
            _source_project_id: &str,
        ) -> BridgeResult<RegenerateOutcome> {
            Ok(RegenerateOutcome {
                success: true,
                new_project_id: None,
            })
        }

        async fn generate_upload_url(&self) -> BridgeResult<String> {
            Ok("https://upload.example/slot".to_string())
        }

        async fn fresh_video_url(&self, _project_id: &str) -> BridgeResult<String> {
            Ok("https://cdn.example/v.mp4".to_string())
        }

        async fn register_push_token(&self, user_id: &str, token: &str) -> BridgeResult<()> {
            self.registered
                .lock()
                .unwrap()
                .push((user_id.to_string(), token.to_string()));
            Ok(())
        }
    }

    fn notifier_with(
        permission: PushPermission,
    ) -> (Notifier, Arc<FixedPushBridge>, Arc<RecordingBackend>, Arc<EventBus>) {
        let bridge = Arc::new(FixedPushBridge::new(permission));
        let backend = Arc::new(RecordingBackend::default());
        let bus = Arc::new(EventBus::new(16));
        let notifier = Notifier::new(
            bridge.clone(),
            backend.clone(),
            Arc::new(MemoryStateStore::new()),
            bus.clone(),
        );
        (notifier, bridge, backend, bus)
    }

    #[tokio::test]
    async fn test_denied_permission_degrades_gracefully() {
        let (notifier, _, backend, bus) = notifier_with(PushPermission::Denied);
        let mut rx = bus.subscribe();

        let result = notifier.register_for_push("user-1").await.unwrap();

        assert!(result.is_none());
        assert!(backend.registered.lock().unwrap().is_empty());
        assert_eq!(rx.try_recv().unwrap(), CoreEvent::Push(PushEvent::Denied));
    }

    #[tokio::test]
    async fn test_granted_permission_registers_and_persists_token() {
        let (notifier, _, backend, bus) = notifier_with(PushPermission::Granted);
        let mut rx = bus.subscribe();

        let token = notifier.register_for_push("user-1").await.unwrap();

        assert_eq!(token.as_deref(), Some("device-token-1"));
        assert_eq!(
            backend.registered.lock().unwrap().as_slice(),
            &[("user-1".to_string(), "device-token-1".to_string())]
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            CoreEvent::Push(PushEvent::Registered {
                user_id: "user-1".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_registration_happens_once_per_install() {
        let (notifier, bridge, backend, _) = notifier_with(PushPermission::Granted);

        notifier.register_for_push("user-1").await.unwrap();
        let second = notifier.register_for_push("user-1").await.unwrap();

        assert_eq!(second.as_deref(), Some("device-token-1"));
        assert_eq!(bridge.permission_requests.load(Ordering::SeqCst), 1);
        assert_eq!(backend.registered.lock().unwrap().len(), 1);
    }
}
