//! Downstream failure classification.
//!
//! Maps every way a forwarded call can go wrong onto the closed
//! [`ErrorKind`] taxonomy with a stable HTTP status. The mapping is pure:
//! the same downstream failure always classifies the same way, whichever
//! caller triggered it.
//!
//! | Condition                                   | Kind                 | Status |
//! |---------------------------------------------|----------------------|--------|
//! | deadline exceeded                           | `Timeout`            | 504    |
//! | refused / DNS / reset                       | `BackendUnreachable` | 503    |
//! | status >= 400, JSON body                    | `BackendError`       | pass-through (502 if >= 500 and opaque) |
//! | status >= 400, non-JSON body                | `BackendMalformed`   | 502    |
//! | 2xx with unreadable body, odd 1xx/3xx       | `BackendMalformed`   | 502    |
//! | anything else                               | `Internal`           | 500    |

use std::time::Duration;

use serde_json::Value;

use chatgate_types::error::{ErrorKind, ForwardFailure};

/// Longest detail string surfaced to callers.
pub const MAX_DETAIL_CHARS: usize = 500;

/// Raw description of a failed downstream exchange, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownstreamFailure {
    /// The call's deadline elapsed before a complete response arrived.
    DeadlineExceeded { after: Duration },
    /// The transport never reached the downstream (refused, DNS, reset).
    Unreachable(String),
    /// A response arrived with a non-success status.
    ErrorStatus { status: u16, body: String },
    /// A success response whose body could not be parsed.
    MalformedBody { status: u16, body: String },
    /// Any other unexpected error while forwarding.
    Unexpected(String),
}

/// Classify a downstream failure.
pub fn classify(failure: &DownstreamFailure) -> ForwardFailure {
    match failure {
        DownstreamFailure::DeadlineExceeded { after } => ForwardFailure::of_kind(
            ErrorKind::Timeout,
            format!("no response from backend within {}s", after.as_secs_f64()),
        ),
        DownstreamFailure::Unreachable(reason) => {
            ForwardFailure::of_kind(ErrorKind::BackendUnreachable, truncate(reason))
        }
        DownstreamFailure::ErrorStatus { status, body } if *status >= 400 => {
            classify_error_status(*status, body)
        }
        DownstreamFailure::ErrorStatus { status, body } => ForwardFailure::of_kind(
            ErrorKind::BackendMalformed,
            format!("unexpected status {status}: {}", detail_or_status(*status, body)),
        ),
        DownstreamFailure::MalformedBody { status, body } => ForwardFailure::of_kind(
            ErrorKind::BackendMalformed,
            format!("unparsable response body: {}", detail_or_status(*status, body)),
        ),
        DownstreamFailure::Unexpected(reason) => ForwardFailure::internal(truncate(reason)),
    }
}

fn classify_error_status(status: u16, body: &str) -> ForwardFailure {
    match serde_json::from_str::<Value>(body.trim()) {
        Ok(value) => match error_detail(&value) {
            Some(detail) => ForwardFailure::new(ErrorKind::BackendError, status, truncate(&detail)),
            None => {
                // JSON, but nothing we can name the error by.
                let status = if status >= 500 { 502 } else { status };
                ForwardFailure::new(
                    ErrorKind::BackendError,
                    status,
                    detail_or_status(status, body),
                )
            }
        },
        Err(_) => {
            let detail = embedded_error_detail(body)
                .map(|d| truncate(&d))
                .unwrap_or_else(|| detail_or_status(status, body));
            ForwardFailure::of_kind(ErrorKind::BackendMalformed, detail)
        }
    }
}

/// Pull a human-readable message out of a JSON error body.
///
/// Looks at `error` and `detail`; either may be a string or an object
/// carrying a `message`. When both are present they are joined.
pub fn error_detail(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    let error = object.get("error").and_then(field_text);
    let detail = object.get("detail").and_then(field_text);

    match (error, detail) {
        (Some(e), Some(d)) if e != d => Some(format!("{e}: {d}")),
        (Some(e), _) => Some(e),
        (None, Some(d)) => Some(d),
        (None, None) => None,
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

/// Best-effort search for a JSON object embedded in otherwise non-JSON text.
pub fn embedded_error_detail(body: &str) -> Option<String> {
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end <= start {
        return None;
    }
    let fragment: Value = serde_json::from_str(&body[start..=end]).ok()?;
    error_detail(&fragment)
}

fn detail_or_status(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        truncate(trimmed)
    }
}

fn truncate(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= MAX_DETAIL_CHARS {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(MAX_DETAIL_CHARS).collect();
        cut.push('…');
        cut
    }
}
