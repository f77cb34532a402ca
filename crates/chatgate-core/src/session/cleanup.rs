//! Background sweep of expired sessions.
//!
//! One loop per scheduler instance, started at most once. The application
//! builds exactly one scheduler at startup and threads it through state, so
//! per-request code paths never arm timers.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clock::Clock;

use super::store::SessionStore;

/// Periodically calls [`SessionStore::sweep`].
pub struct SessionCleanupScheduler<S, C> {
    store: Arc<S>,
    clock: C,
    interval: Duration,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<S, C> SessionCleanupScheduler<S, C>
where
    S: SessionStore + 'static,
    C: Clock + Clone + 'static,
{
    pub fn new(store: Arc<S>, clock: C, interval: Duration) -> Self {
        Self {
            store,
            clock,
            interval,
            cancel: CancellationToken::new(),
            task: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the sweep loop. Returns `false` without spawning anything if
    /// the loop was already started, the scheduler was shut down, or the
    /// interval is zero.
    pub fn start(&self) -> bool {
        if self.interval.is_zero() {
            warn!("session cleanup interval is zero, not starting");
            return false;
        }

        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if task.is_some() || self.cancel.is_cancelled() {
            debug!("session cleanup already started, ignoring");
            return false;
        }

        let store = self.store.clone();
        let clock = self.clock.clone();
        let cancel = self.cancel.clone();
        let period = self.interval;

        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; nothing can be expired yet.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = store.sweep(clock.now()).await;
                        if removed > 0 {
                            info!(removed, "swept expired sessions");
                        } else {
                            debug!("session sweep found nothing to remove");
                        }
                    }
                }
            }
            debug!("session cleanup loop stopped");
        }));

        info!(interval_secs = period.as_secs(), "session cleanup started");
        true
    }

    pub fn is_running(&self) -> bool {
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let handle = self
            .task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("session cleanup task ended abnormally: {e}");
            }
        }
    }
}
