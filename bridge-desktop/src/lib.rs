//! # Desktop Bridge Implementations
//!
//! Desktop-ready implementations of the `bridge-traits` contracts:
//!
//! - [`ReqwestHttpClient`] - HTTP via reqwest with retry/backoff
//! - [`SqliteStateStore`] - durable key-value state via sqlx/SQLite
//! - [`UnsupportedPushBridge`] - push permission always denied (desktop
//!   has no push transport; the core degrades to poll-only updates)

pub mod http;
pub mod push;
pub mod state;

pub use http::ReqwestHttpClient;
pub use push::UnsupportedPushBridge;
pub use state::SqliteStateStore;
