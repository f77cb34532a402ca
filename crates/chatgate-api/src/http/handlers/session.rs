//! Session inspection: look up or drop one cached session by id.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use chatgate_core::session::store::SessionSnapshot;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /api/sessions/{session_id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    state
        .proxy
        .find_session(&session_id)
        .await
        .map(Json)
        .ok_or_else(|| not_found(&session_id))
}

/// DELETE /api/sessions/{session_id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let removed = state.proxy.clear_session(&session_id).await;
    if removed == 0 {
        return Err(not_found(&session_id));
    }

    Ok(Json(json!({
        "message": "Session deleted",
        "session_id": session_id,
        "removed": removed,
    })))
}

fn not_found(session_id: &str) -> AppError {
    AppError::NotFound(format!("no cached session {session_id}"))
}
