//! Infrastructure adapters for chatgate.
//!
//! Implements the ports defined in `chatgate-core`: the HTTP forwarder to
//! the downstream agent, plus configuration loading.

pub mod config;
pub mod forwarder;
