//! Axum router configuration with middleware.
//!
//! Chat routes live under `/api/`; `/health` sits at the root for load
//! balancers. Middleware: CORS, request tracing.

use axum::Router;
use axum::http::{HeaderName, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::extractors::identity::CLIENT_ID_HEADER;
use crate::http::handlers;
use crate::http::response::SESSION_ID_HEADER;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(CLIENT_ID_HEADER)])
        .expose_headers([SESSION_ID_HEADER]);

    let api_routes = Router::new()
        .route(
            "/chat",
            post(handlers::chat::post_chat)
                .delete(handlers::chat::delete_chat)
                .get(handlers::health::health),
        )
        .route("/query", post(handlers::chat::post_query))
        .route(
            "/sessions/{session_id}",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route("/config", get(handlers::config::get_config));

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
