//! Response wrappers that add headers or pick status codes.

use axum::Json;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use chatgate_core::proxy::handler::{HealthReport, HealthStatus};
use chatgate_types::chat::ChatReply;

/// Response header echoing the session a reply belongs to.
pub const SESSION_ID_HEADER: HeaderName = HeaderName::from_static("x-session-id");

/// A chat reply, with the session id mirrored into [`SESSION_ID_HEADER`].
#[derive(Debug)]
pub struct ChatResponse(pub ChatReply);

impl IntoResponse for ChatResponse {
    fn into_response(self) -> Response {
        let header = match HeaderValue::from_str(&self.0.session_id) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(
                    session_id = ?self.0.session_id,
                    "session id is not a valid header value, omitting {SESSION_ID_HEADER}"
                );
                None
            }
        };
        let mut response = Json(self.0).into_response();
        if let Some(value) = header {
            response.headers_mut().insert(SESSION_ID_HEADER, value);
        }
        response
    }
}

/// A health report; 503 when the downstream is unreachable.
#[derive(Debug)]
pub struct HealthResponse(pub HealthReport);

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        let status = match self.0.status {
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
            HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        };
        (status, Json(self.0)).into_response()
    }
}
