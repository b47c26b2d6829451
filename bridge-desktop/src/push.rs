//! Push Notification Bridge for Desktop
//!
//! Desktop builds have no push transport; permission requests always
//! report `Denied` and the core falls back to poll-only updates.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    push::{PushBridge, PushPermission},
};
use tracing::debug;

/// Push bridge for platforms without a push notification transport
#[derive(Debug, Default)]
pub struct UnsupportedPushBridge;

impl UnsupportedPushBridge {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PushBridge for UnsupportedPushBridge {
    async fn request_permission(&self) -> Result<PushPermission> {
        debug!("Push notifications unsupported on this platform");
        Ok(PushPermission::Denied)
    }

    async fn device_token(&self) -> Result<String> {
        Err(BridgeError::NotAvailable(
            "Push notifications are not supported on this platform".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_permission_always_denied() {
        let bridge = UnsupportedPushBridge::new();
        assert_eq!(
            bridge.request_permission().await.unwrap(),
            PushPermission::Denied
        );
        assert!(bridge.device_token().await.is_err());
    }
}
