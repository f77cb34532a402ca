//! Application error type mapping to HTTP status codes and the error body.
//!
//! Every failure renders as
//! `{"error": ..., "kind": ..., "detail": ..., "status": ...}` with the
//! status code repeated in the body.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatgate_types::error::{EnvelopeError, ErrorKind, ForwardFailure};

/// Detail shown for internal failures outside development.
pub const REDACTED_DETAIL: &str = "Internal server error";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// A classified downstream failure.
    Forward(ForwardFailure),
    /// Bad input from the caller.
    Validation(String),
    /// The addressed resource is not cached.
    NotFound(String),
}

impl AppError {
    /// Wrap a downstream failure, hiding internal details unless `development`.
    pub fn forward(failure: ForwardFailure, development: bool) -> Self {
        if failure.kind == ErrorKind::Internal && !development {
            AppError::Forward(ForwardFailure {
                detail: REDACTED_DETAIL.to_string(),
                ..failure
            })
        } else {
            AppError::Forward(failure)
        }
    }
}

impl From<EnvelopeError> for AppError {
    fn from(e: EnvelopeError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, kind, detail) = match self {
            AppError::Forward(failure) => (
                failure.http_status,
                failure.kind.summary(),
                failure.kind.as_str(),
                failure.detail,
            ),
            AppError::Validation(detail) => (400, "Invalid request", "validation", detail),
            AppError::NotFound(detail) => (404, "Session not found", "not_found", detail),
        };

        let code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "error": error,
            "kind": kind,
            "detail": detail,
            "status": code.as_u16(),
        });

        (code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_internal_detail_redacted_outside_development() {
        let err = AppError::forward(ForwardFailure::internal("pool exhausted at 0x7f"), false);
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], REDACTED_DETAIL);
        assert_eq!(body["kind"], "internal");
    }

    #[tokio::test]
    async fn test_internal_detail_kept_in_development() {
        let err = AppError::forward(ForwardFailure::internal("pool exhausted"), true);
        let (_, body) = render(err).await;
        assert_eq!(body["detail"], "pool exhausted");
    }

    #[tokio::test]
    async fn test_forward_failure_uses_classified_status() {
        let err = AppError::forward(
            ForwardFailure::of_kind(ErrorKind::Timeout, "no response"),
            false,
        );
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["status"], 504);
        assert_eq!(body["kind"], "timeout");
        assert_eq!(body["detail"], "no response");
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let (status, body) = render(AppError::Validation("message is empty".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn test_not_found_renders_error_body() {
        let (status, body) = render(AppError::NotFound("no session sess-9".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
        assert_eq!(body["error"], "Session not found");
        assert_eq!(body["detail"], "no session sess-9");
        assert_eq!(body["status"], 404);
    }
}
