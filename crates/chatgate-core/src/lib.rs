//! Business logic and port definitions for chatgate.
//!
//! This crate defines the ports (`ChatBackend`, `SessionStore`, `Clock`) that
//! the infrastructure layer implements or plugs in, plus the proxy logic that
//! drives them. It depends only on `chatgate-types` -- never on
//! `chatgate-infra` or any HTTP crate.

pub mod backend;
pub mod classify;
pub mod clock;
pub mod proxy;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
