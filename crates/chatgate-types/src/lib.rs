//! Shared domain types for chatgate.
//!
//! This crate contains the types that flow between the proxy layers:
//! session records, chat envelopes and outcomes, the error taxonomy,
//! and the process configuration.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod session;
