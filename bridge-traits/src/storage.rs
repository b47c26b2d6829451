//! Durable Client State Storage
//!
//! Provides a platform-agnostic key-value trait for the small amount of
//! state the client core persists across process restarts (the job list
//! and the active user id). Values are opaque strings; callers are
//! expected to JSON-encode structured payloads.

use async_trait::async_trait;

use crate::error::Result;

/// Durable key-value store for client state
///
/// Platform implementations:
/// - Desktop: SQLite-backed table
/// - iOS/Android: app-sandboxed database or preferences
/// - Web: IndexedDB
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::StateStore;
///
/// async fn remember_user(store: &dyn StateStore, user_id: &str) -> Result<()> {
///     store.set("user.id", user_id).await
/// }
/// ```
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Store a value under a key, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a value
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove a key; removing a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check whether a key exists
    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// List all stored keys in lexicographic order
    async fn list_keys(&self) -> Result<Vec<String>>;
}

/// Well-known keys used by the client core.
pub mod keys {
    /// JSON-encoded array of persisted jobs (full list, rewritten on
    /// every store mutation).
    pub const JOBS: &str = "jobs.v1";

    /// The active user id.
    pub const USER_ID: &str = "user.id";

    /// Device push token, present once push registration succeeded.
    pub const PUSH_TOKEN: &str = "push.token";
}
