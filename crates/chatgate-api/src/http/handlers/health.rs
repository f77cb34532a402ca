//! Health endpoint, served at both `/health` and `GET /api/chat`.

use axum::extract::State;

use crate::http::response::HealthResponse;
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> HealthResponse {
    HealthResponse(state.proxy.health().await)
}
