//! ChatProxy -- the per-request orchestrator.
//!
//! Follows a fixed state machine for each inbound chat:
//! resolve identity -> ensure session -> forward -> (touch + respond | respond).
//!
//! Side effects are confined to the session store and the single outbound
//! call. A failed forward never touches the cached session, so a transient
//! downstream error cannot evict or corrupt a session that is still valid.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use chatgate_types::chat::{ChatOutcome, ChatRequestEnvelope};
use chatgate_types::error::{ErrorKind, ForwardFailure};

use crate::backend::{ChatBackend, ForwardRequest};
use crate::proxy::identity::IdentityHints;
use crate::session::store::{SessionSnapshot, SessionStore};

/// Overall downstream health as seen from the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The downstream answered its health probe successfully.
    Healthy,
    /// The downstream answered, but with an error.
    Degraded,
    /// The downstream could not be reached in time.
    Unhealthy,
}

/// Health payload for the `GET` endpoints and the `health` command.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub backend_url: String,
    pub backend_reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub cached_sessions: usize,
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    fn from_probe(
        backend_url: String,
        probe: Result<(), ForwardFailure>,
        cached_sessions: usize,
    ) -> Self {
        let (status, reachable, error_kind, detail) = match probe {
            Ok(()) => (HealthStatus::Healthy, true, None, None),
            Err(f) => {
                let reachable = matches!(
                    f.kind,
                    ErrorKind::BackendError | ErrorKind::BackendMalformed
                );
                let status = if reachable {
                    HealthStatus::Degraded
                } else {
                    HealthStatus::Unhealthy
                };
                (status, reachable, Some(f.kind), Some(f.detail))
            }
        };

        Self {
            status,
            backend_url,
            backend_reachable: reachable,
            error_kind,
            detail,
            cached_sessions,
            checked_at: Utc::now(),
        }
    }
}

/// Orchestrates session lookup and forwarding for chat requests.
///
/// Generic over the store and backend so the in-memory store can be swapped
/// for a shared cache without touching this type.
pub struct ChatProxy<S, B> {
    store: Arc<S>,
    backend: Arc<B>,
    request_timeout: Duration,
}

impl<S, B> ChatProxy<S, B>
where
    S: SessionStore,
    B: ChatBackend,
{
    pub fn new(store: Arc<S>, backend: Arc<B>, request_timeout: Duration) -> Self {
        Self {
            store,
            backend,
            request_timeout,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Pick the cache key for a request.
    pub fn resolve_client_id(&self, hints: &IdentityHints) -> String {
        hints.resolve()
    }

    /// Run one chat exchange.
    ///
    /// An explicit `session_id` on the envelope is used as-is without
    /// consulting the store. Session creation failures abort the request
    /// before any chat call is made. Nothing is retried here.
    #[tracing::instrument(
        name = "proxy_chat",
        skip(self, envelope),
        fields(client_id = %envelope.client_id, explicit_session = envelope.session_id.is_some())
    )]
    pub async fn handle_chat(&self, envelope: ChatRequestEnvelope) -> ChatOutcome {
        let ChatRequestEnvelope {
            client_id,
            message,
            session_id,
            context,
        } = envelope;

        let session_id = match session_id {
            Some(explicit) => explicit,
            None => match self
                .store
                .get_or_create(&client_id, self.backend.as_ref())
                .await
            {
                Ok(resolved) => {
                    debug!(session_id = %resolved.session_id, is_new = resolved.is_new, "session resolved");
                    resolved.session_id
                }
                Err(failure) => {
                    warn!(kind = %failure.kind, detail = %failure.detail, "session creation failed");
                    return ChatOutcome::Failure(failure);
                }
            },
        };

        let request = ForwardRequest {
            session_id,
            client_id: client_id.clone(),
            message,
            context,
            timeout: self.request_timeout,
        };

        match self.backend.send(request).await {
            ChatOutcome::Success(reply) => {
                self.store.touch(&client_id, &reply.session_id).await;
                ChatOutcome::Success(reply)
            }
            ChatOutcome::Failure(failure) => {
                warn!(
                    kind = %failure.kind,
                    status = failure.http_status,
                    detail = %failure.detail,
                    "chat forward failed"
                );
                ChatOutcome::Failure(failure)
            }
        }
    }

    /// Drop every cached record pointing at `session_id`.
    pub async fn clear_session(&self, session_id: &str) -> usize {
        let removed = self.store.invalidate_session(session_id).await;
        debug!(%session_id, removed, "session cleared");
        removed
    }

    /// Look up the cached record carrying `session_id`.
    pub async fn find_session(&self, session_id: &str) -> Option<SessionSnapshot> {
        self.store.find_session(session_id).await
    }

    /// Drop the cached record for `client_id`.
    pub async fn clear_client(&self, client_id: &str) -> bool {
        self.store.invalidate(client_id).await
    }

    /// Probe the downstream and report alongside the cache size.
    pub async fn health(&self) -> HealthReport {
        let probe = self.backend.probe().await;
        let cached = self.store.len().await;
        HealthReport::from_probe(self.backend.describe(), probe, cached)
    }
}
