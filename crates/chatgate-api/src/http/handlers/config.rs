//! Non-sensitive runtime configuration for clients.

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use chatgate_types::config::ProxyConfig;

use crate::state::AppState;

/// Configuration as exposed to callers. Never carries URL credentials.
#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub version: &'static str,
    pub environment: String,
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub session_create_timeout_secs: u64,
    pub health_timeout_secs: u64,
    pub session_ttl_secs: u64,
    pub cleanup_interval_secs: u64,
    pub features: Features,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct Features {
    pub session_cache: bool,
    pub explicit_session_override: bool,
    pub query_endpoint: bool,
}

impl ConfigView {
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            environment: config.environment.clone(),
            backend_url: config.redacted_backend_url(),
            request_timeout_secs: config.request_timeout_secs,
            session_create_timeout_secs: config.session_create_timeout_secs,
            health_timeout_secs: config.health_timeout_secs,
            session_ttl_secs: config.session_ttl_secs,
            cleanup_interval_secs: config.cleanup_interval_secs,
            features: Features {
                session_cache: true,
                explicit_session_override: true,
                query_endpoint: true,
            },
            started_at: None,
        }
    }
}

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigView> {
    let mut view = ConfigView::from_config(&state.config);
    view.started_at = Some(state.started_at);
    Json(view)
}
