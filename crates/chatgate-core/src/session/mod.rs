//! Client identity to downstream session cache.
//!
//! - [`store::SessionStore`] is the pluggable port (an implementation backed
//!   by a shared external cache can replace the in-memory one).
//! - [`memory::InMemorySessionStore`] is the process-local implementation.
//! - [`cleanup::SessionCleanupScheduler`] reclaims expired records.

pub mod cleanup;
pub mod memory;
pub mod store;
