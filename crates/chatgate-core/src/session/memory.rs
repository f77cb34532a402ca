//! Process-local [`SessionStore`] backed by `DashMap`.
//!
//! Records live in one `DashMap` keyed by client id. Session creation is
//! serialized per client through a second map of `tokio::sync::Mutex`
//! handles, so a slow downstream creation for one client never blocks
//! another client. Values are cloned out of the maps immediately -- a
//! `DashMap` guard is never held across an `.await`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use chatgate_types::error::ForwardFailure;
use chatgate_types::session::{SESSION_TTL, SessionRecord, ttl_delta};

use crate::backend::SessionCreator;
use crate::clock::{Clock, SystemClock};

use super::store::{ResolvedSession, SessionSnapshot, SessionStore};

/// In-memory session cache.
///
/// Not shared across processes; see [`SessionStore`] for plugging in a
/// shared cache.
#[derive(Debug)]
pub struct InMemorySessionStore<C: Clock = SystemClock> {
    records: DashMap<String, SessionRecord>,
    /// Per-client creation locks. Pruned by `sweep` once nobody holds them.
    creation_locks: DashMap<String, Arc<Mutex<()>>>,
    ttl: TimeDelta,
    clock: C,
}

impl InMemorySessionStore<SystemClock> {
    /// Create a store on the wall clock with the default 30 minute TTL.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemorySessionStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemorySessionStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            records: DashMap::new(),
            creation_locks: DashMap::new(),
            ttl: ttl_delta(SESSION_TTL),
            clock,
        }
    }

    /// Override the idle TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl_delta(ttl);
        self
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Snapshot of the record for `client_id`, live or not.
    pub fn get(&self, client_id: &str) -> Option<SessionRecord> {
        self.records.get(client_id).map(|r| r.value().clone())
    }

    fn live_session(&self, client_id: &str) -> Option<String> {
        let now = self.clock.now();
        self.records
            .get(client_id)
            .filter(|r| r.is_live(now, self.ttl))
            .map(|r| r.session_id.clone())
    }

    fn creation_lock(&self, client_id: &str) -> Arc<Mutex<()>> {
        self.creation_locks
            .entry(client_id.to_string())
            .or_default()
            .value()
            .clone()
    }
}

impl<C: Clock> SessionStore for InMemorySessionStore<C> {
    async fn get_or_create<S>(
        &self,
        client_id: &str,
        creator: &S,
    ) -> Result<ResolvedSession, ForwardFailure>
    where
        S: SessionCreator,
    {
        if let Some(session_id) = self.live_session(client_id) {
            debug!(%client_id, %session_id, "session cache hit");
            return Ok(ResolvedSession::existing(session_id));
        }

        let lock = self.creation_lock(client_id);
        let _guard = lock.lock().await;

        // Another caller may have created the session while we waited.
        if let Some(session_id) = self.live_session(client_id) {
            debug!(%client_id, %session_id, "session created by concurrent request");
            return Ok(ResolvedSession::existing(session_id));
        }

        let session_id = creator.create_session().await?;
        let record = SessionRecord::new(client_id, session_id.clone(), self.clock.now());
        self.records.insert(client_id.to_string(), record);
        info!(%client_id, %session_id, "created downstream session");

        Ok(ResolvedSession::created(session_id))
    }

    async fn touch(&self, client_id: &str, session_id: &str) {
        let now = self.clock.now();
        let Some(mut record) = self.records.get_mut(client_id) else {
            debug!(%client_id, "touch for unknown client ignored");
            return;
        };

        record.last_activity_at = now;
        if record.session_id != session_id {
            debug!(
                %client_id,
                old = %record.session_id,
                new = %session_id,
                "downstream rotated session id"
            );
            record.session_id = session_id.to_string();
        }
    }

    async fn invalidate(&self, client_id: &str) -> bool {
        let removed = self.records.remove(client_id).is_some();
        self.creation_locks
            .remove_if(client_id, |_, lock| Arc::strong_count(lock) == 1);
        if removed {
            debug!(%client_id, "session invalidated");
        }
        removed
    }

    async fn invalidate_session(&self, session_id: &str) -> usize {
        let mut removed = 0;
        self.records.retain(|_, record| {
            let keep = record.session_id != session_id;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    async fn find_session(&self, session_id: &str) -> Option<SessionSnapshot> {
        let record = self
            .records
            .iter()
            .find(|r| r.session_id == session_id)
            .map(|r| r.value().clone())?;
        let is_live = record.is_live(self.clock.now(), self.ttl);
        Some(SessionSnapshot { record, is_live })
    }

    async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl;
        let mut removed = 0;
        self.records.retain(|_, record| {
            let live = record.is_live(now, ttl);
            if !live {
                removed += 1;
            }
            live
        });

        // A lock nobody else references guards no in-flight creation.
        self.creation_locks
            .retain(|_, lock| Arc::strong_count(lock) > 1);

        removed
    }

    async fn len(&self) -> usize {
        self.records.len()
    }
}
