use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable classification of a failed downstream exchange.
///
/// This is a closed set: every failure surfaced to a caller carries exactly
/// one of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The deadline elapsed before the downstream answered.
    Timeout,
    /// Connection refused, DNS failure, or the connection was reset.
    BackendUnreachable,
    /// Non-2xx response with a parseable JSON error body.
    BackendError,
    /// Non-2xx response with an unparsable body, or a 2xx body we could not read.
    BackendMalformed,
    /// Anything else that went wrong while forwarding.
    Internal,
}

impl ErrorKind {
    /// Wire name used in JSON bodies and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::BackendUnreachable => "backend_unreachable",
            ErrorKind::BackendError => "backend_error",
            ErrorKind::BackendMalformed => "backend_malformed",
            ErrorKind::Internal => "internal",
        }
    }

    /// Short human-readable summary for the `error` field of a response.
    pub fn summary(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "Backend request timed out",
            ErrorKind::BackendUnreachable => "Backend service unavailable",
            ErrorKind::BackendError => "Backend returned an error",
            ErrorKind::BackendMalformed => "Backend returned an invalid response",
            ErrorKind::Internal => "Internal proxy error",
        }
    }

    /// Status code used when the kind alone determines it.
    ///
    /// `BackendError` usually passes the downstream status through instead.
    pub fn default_status(&self) -> u16 {
        match self {
            ErrorKind::Timeout => 504,
            ErrorKind::BackendUnreachable => 503,
            ErrorKind::BackendError => 502,
            ErrorKind::BackendMalformed => 502,
            ErrorKind::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified downstream failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind} ({http_status}): {detail}")]
pub struct ForwardFailure {
    pub kind: ErrorKind,
    pub http_status: u16,
    pub detail: String,
}

impl ForwardFailure {
    pub fn new(kind: ErrorKind, http_status: u16, detail: impl Into<String>) -> Self {
        Self {
            kind,
            http_status,
            detail: detail.into(),
        }
    }

    /// Failure whose status is the kind's default status.
    pub fn of_kind(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self::new(kind, kind.default_status(), detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::of_kind(ErrorKind::Internal, detail)
    }
}

/// Errors raised while validating an inbound chat envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("message must not be empty")]
    EmptyMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_statuses_follow_taxonomy() {
        assert_eq!(ErrorKind::Timeout.default_status(), 504);
        assert_eq!(ErrorKind::BackendUnreachable.default_status(), 503);
        assert_eq!(ErrorKind::BackendMalformed.default_status(), 502);
        assert_eq!(ErrorKind::Internal.default_status(), 500);
    }

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::BackendUnreachable).unwrap();
        assert_eq!(json, "\"backend_unreachable\"");
        assert_eq!(ErrorKind::BackendUnreachable.to_string(), "backend_unreachable");
    }

    #[test]
    fn test_forward_failure_display() {
        let err = ForwardFailure::of_kind(ErrorKind::Timeout, "no answer after 120s");
        assert_eq!(err.http_status, 504);
        assert_eq!(err.to_string(), "timeout (504): no answer after 120s");
    }
}
