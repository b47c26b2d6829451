//! Push Notification Bridge
//!
//! Abstracts the OS-level push notification registration flow. The core
//! only needs two capabilities: asking the user for permission and
//! obtaining a device token. Delivery of the actual notifications is a
//! platform concern; the core treats an arriving notification as a hint
//! to refresh a single project.

use async_trait::async_trait;

use crate::error::Result;

/// Outcome of an OS permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushPermission {
    /// User granted notification permission
    Granted,
    /// User denied permission; the client degrades to poll-only updates
    Denied,
}

impl PushPermission {
    pub fn is_granted(&self) -> bool {
        matches!(self, PushPermission::Granted)
    }
}

/// OS push notification capability
///
/// Implementations must be safe to call repeatedly: `request_permission`
/// should return the already-decided state without re-prompting when the
/// OS has recorded a prior answer.
#[async_trait]
pub trait PushBridge: Send + Sync {
    /// Request notification permission from the OS
    async fn request_permission(&self) -> Result<PushPermission>;

    /// Obtain the device push token
    ///
    /// Only valid after permission was granted.
    async fn device_token(&self) -> Result<String>;
}
