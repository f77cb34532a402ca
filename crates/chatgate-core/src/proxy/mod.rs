//! Request orchestration: identity resolution, session lookup, forwarding.

pub mod handler;
pub mod identity;
