//! Ports for the downstream conversational service.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition) -- no
//! `async_trait` macro. Implementations live in chatgate-infra
//! (e.g., `HttpChatForwarder`).

use std::future::Future;
use std::time::Duration;

use chatgate_types::chat::{ChatContext, ChatOutcome};
use chatgate_types::error::ForwardFailure;

/// Something that can open a new downstream session.
///
/// Split out of [`ChatBackend`] so a `SessionStore` only depends on the one
/// capability it needs.
pub trait SessionCreator: Send + Sync {
    /// Ask the downstream for a fresh session id.
    fn create_session(&self) -> impl Future<Output = Result<String, ForwardFailure>> + Send;
}

/// One chat turn to forward downstream.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub session_id: String,
    pub client_id: String,
    pub message: String,
    pub context: ChatContext,
    /// Deadline for the whole exchange, body included.
    pub timeout: Duration,
}

/// The downstream chat service.
pub trait ChatBackend: SessionCreator {
    /// Forward a chat turn. Never panics or hangs past `request.timeout`;
    /// every failure comes back as a classified `ChatOutcome::Failure`.
    fn send(&self, request: ForwardRequest) -> impl Future<Output = ChatOutcome> + Send;

    /// Check that the downstream answers at all.
    fn probe(&self) -> impl Future<Output = Result<(), ForwardFailure>> + Send;

    /// Where requests go, for health reporting. Must not contain credentials.
    fn describe(&self) -> String;
}
