//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (e.g., `core-client`, `core-jobs`, `core-upload`,
//! `core-notify`). Host applications can depend on `clipcore-workspace` and
//! enable the documented features without needing to wire each crate
//! individually; `core-client` provides the assembled façade.
