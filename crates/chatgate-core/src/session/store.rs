//! SessionStore trait definition.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;

use chatgate_types::error::ForwardFailure;
use chatgate_types::session::SessionRecord;

use crate::backend::SessionCreator;

/// Session id handed back by [`SessionStore::get_or_create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    pub session_id: String,
    /// True when the downstream was asked for a new session on this call.
    pub is_new: bool,
}

impl ResolvedSession {
    pub fn existing(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            is_new: false,
        }
    }

    pub fn created(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            is_new: true,
        }
    }
}

/// A cached record as seen at lookup time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub record: SessionRecord,
    /// Whether the record was still within its TTL when looked up.
    pub is_live: bool,
}

/// Concurrent cache of client id -> session record with TTL expiry.
///
/// All operations for one client id are atomic with respect to each other.
/// In particular, concurrent `get_or_create` calls for an unseen client
/// trigger exactly one downstream session creation; the other callers
/// observe the winner's session.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro),
/// so an implementation backed by a networked cache fits the same shape.
pub trait SessionStore: Send + Sync {
    /// Return the live session for `client_id`, creating one through
    /// `creator` if there is none. On creation failure nothing is installed.
    fn get_or_create<S>(
        &self,
        client_id: &str,
        creator: &S,
    ) -> impl Future<Output = Result<ResolvedSession, ForwardFailure>> + Send
    where
        S: SessionCreator;

    /// Refresh the activity timestamp, replacing the session id if the
    /// downstream rotated it. No-op when the client has no record.
    fn touch(&self, client_id: &str, session_id: &str) -> impl Future<Output = ()> + Send;

    /// Remove the client's record. Returns whether one existed.
    fn invalidate(&self, client_id: &str) -> impl Future<Output = bool> + Send;

    /// Remove every record carrying `session_id`. Returns how many were removed.
    fn invalidate_session(&self, session_id: &str) -> impl Future<Output = usize> + Send;

    /// Find the record carrying `session_id`, live or not yet swept.
    fn find_session(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Option<SessionSnapshot>> + Send;

    /// Remove every record with `now - last_activity_at >= ttl`.
    /// Returns how many were removed.
    fn sweep(&self, now: DateTime<Utc>) -> impl Future<Output = usize> + Send;

    /// Number of cached records (live or not yet swept).
    fn len(&self) -> impl Future<Output = usize> + Send;

    fn is_empty(&self) -> impl Future<Output = bool> + Send {
        async move { self.len().await == 0 }
    }
}
