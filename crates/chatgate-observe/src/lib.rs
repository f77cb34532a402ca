//! Observability setup for chatgate.

pub mod tracing_setup;
