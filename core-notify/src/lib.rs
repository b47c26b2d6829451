//! # Push Notification Core
//!
//! Once-per-install push registration with graceful degradation to
//! poll-only updates when permission is denied.

pub mod error;
pub mod notifier;

pub use error::{NotifyError, Result};
pub use notifier::Notifier;
