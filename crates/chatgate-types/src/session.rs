//! Cached client-to-session mapping.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Idle time after which a cached session is considered expired.
pub const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Period between cleanup sweeps of the session cache.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// One client's active conversation with the downstream service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque caller identity; the cache key.
    pub client_id: String,
    /// Opaque identifier issued by the downstream service.
    pub session_id: String,
    /// Bumped on every successful exchange; drives expiry.
    pub last_activity_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(
        client_id: impl Into<String>,
        session_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            session_id: session_id.into(),
            last_activity_at: now,
        }
    }

    /// A record is live while `now - last_activity_at < ttl`.
    pub fn is_live(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now.signed_duration_since(self.last_activity_at) < ttl
    }
}

/// Convert a std duration to a chrono delta, saturating on overflow.
pub fn ttl_delta(ttl: Duration) -> TimeDelta {
    TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX)
}
