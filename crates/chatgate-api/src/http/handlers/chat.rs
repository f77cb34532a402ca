//! Chat endpoints: forward a message, clear a session, single-question query.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::Instrument;
use uuid::Uuid;

use chatgate_types::chat::ChatRequestEnvelope;

use crate::http::error::AppError;
use crate::http::extractors::identity::ClientIdentity;
use crate::http::response::ChatResponse;
use crate::state::AppState;

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
    #[serde(default, alias = "clientId")]
    pub client_id: Option<String>,
    #[serde(default)]
    pub context: Option<Map<String, Value>>,
}

/// Body of `POST /api/query`.
#[derive(Debug, Deserialize)]
pub struct QueryBody {
    #[serde(default)]
    pub question: String,
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
    #[serde(default, alias = "clientId")]
    pub client_id: Option<String>,
}

/// Query string of `DELETE /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ClearParams {
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
}

/// POST /api/chat
pub async fn post_chat(
    State(state): State<AppState>,
    ClientIdentity(hints): ClientIdentity,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Result<ChatResponse, AppError> {
    let Json(body) = body?;
    let client_id = state.proxy.resolve_client_id(&hints.with_body(body.client_id));
    let envelope = ChatRequestEnvelope::new(
        client_id,
        body.message,
        body.session_id,
        body.context.unwrap_or_default(),
    )?;
    forward(&state, envelope).await
}

/// POST /api/query
///
/// Single-question form of `/api/chat` with no caller context.
pub async fn post_query(
    State(state): State<AppState>,
    ClientIdentity(hints): ClientIdentity,
    body: Result<Json<QueryBody>, JsonRejection>,
) -> Result<ChatResponse, AppError> {
    let Json(body) = body?;
    let client_id = state.proxy.resolve_client_id(&hints.with_body(body.client_id));
    let envelope =
        ChatRequestEnvelope::new(client_id, body.question, body.session_id, Map::new())?;
    forward(&state, envelope).await
}

/// DELETE /api/chat?session_id=...
pub async fn delete_chat(
    State(state): State<AppState>,
    params: Result<Query<ClearParams>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(params) = params?;
    let session_id = params
        .session_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("session_id is required".to_string()))?;

    let removed = state.proxy.clear_session(&session_id).await;

    Ok(Json(json!({
        "message": "Session cleared",
        "session_id": session_id,
        "removed": removed,
    })))
}

async fn forward(state: &AppState, envelope: ChatRequestEnvelope) -> Result<ChatResponse, AppError> {
    let request_id = Uuid::now_v7();
    let client_id = envelope.client_id.clone();
    let span = tracing::info_span!("chat_request", %request_id, client_id = %client_id);

    let outcome = state.proxy.handle_chat(envelope).instrument(span).await;

    match outcome.into_result() {
        Ok(mut reply) => {
            reply
                .metadata
                .insert("session_id".to_string(), json!(reply.session_id));
            reply
                .metadata
                .insert("client_id".to_string(), json!(client_id));
            Ok(ChatResponse(reply))
        }
        Err(failure) => Err(AppError::forward(failure, state.config.is_development())),
    }
}
