//! Chat request and outcome types.
//!
//! These model the unit of work flowing through the proxy: the validated
//! inbound envelope, and the result of forwarding it downstream.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EnvelopeError, ForwardFailure};

/// Caller-controlled context passed through to the downstream opaquely.
pub type ChatContext = Map<String, Value>;

/// A validated inbound chat request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequestEnvelope {
    pub client_id: String,
    pub message: String,
    /// Explicit session override; when present the session cache is bypassed.
    pub session_id: Option<String>,
    pub context: ChatContext,
}

impl ChatRequestEnvelope {
    /// Build an envelope, rejecting blank messages.
    ///
    /// A blank `session_id` is treated as absent.
    pub fn new(
        client_id: impl Into<String>,
        message: impl Into<String>,
        session_id: Option<String>,
        context: ChatContext,
    ) -> Result<Self, EnvelopeError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(EnvelopeError::EmptyMessage);
        }

        Ok(Self {
            client_id: client_id.into(),
            message,
            session_id: session_id.filter(|s| !s.trim().is_empty()),
            context,
        })
    }
}

/// A successful downstream reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Session the reply belongs to (may differ from the one sent if rotated).
    pub session_id: String,
    pub reply: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

/// Result of a forwarded call. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    Success(ChatReply),
    Failure(ForwardFailure),
}

impl ChatOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ChatOutcome::Success(_))
    }

    pub fn into_result(self) -> Result<ChatReply, ForwardFailure> {
        match self {
            ChatOutcome::Success(reply) => Ok(reply),
            ChatOutcome::Failure(failure) => Err(failure),
        }
    }
}

impl From<Result<ChatReply, ForwardFailure>> for ChatOutcome {
    fn from(result: Result<ChatReply, ForwardFailure>) -> Self {
        match result {
            Ok(reply) => ChatOutcome::Success(reply),
            Err(failure) => ChatOutcome::Failure(failure),
        }
    }
}
