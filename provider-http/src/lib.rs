//! # HTTP Video Backend Provider
//!
//! JSON-over-HTTP implementation of the `VideoBackend` contract from
//! `bridge-traits`, with retry/backoff on idempotent reads and strict
//! one-shot semantics for mutations.

pub mod client;
pub mod error;
pub mod types;

pub use client::HttpVideoBackend;
pub use error::{HttpBackendError, Result};
