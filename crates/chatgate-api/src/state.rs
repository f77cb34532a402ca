//! Application state wiring the proxy together.
//!
//! The proxy and scheduler are generic over store/backend/clock traits;
//! AppState pins them to the concrete implementations.

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};

use chatgate_core::clock::SystemClock;
use chatgate_core::proxy::handler::ChatProxy;
use chatgate_core::session::cleanup::SessionCleanupScheduler;
use chatgate_core::session::memory::InMemorySessionStore;
use chatgate_infra::forwarder::HttpChatForwarder;
use chatgate_types::config::ProxyConfig;

pub type ConcreteSessionStore = InMemorySessionStore<SystemClock>;

pub type ConcreteProxy = ChatProxy<ConcreteSessionStore, HttpChatForwarder>;

pub type ConcreteScheduler = SessionCleanupScheduler<ConcreteSessionStore, SystemClock>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers. Built once per process,
/// so there is exactly one session cache and one cleanup scheduler.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<ConcreteProxy>,
    pub scheduler: Arc<ConcreteScheduler>,
    pub config: Arc<ProxyConfig>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wire the store, forwarder, proxy and (not yet started) scheduler.
    pub fn init(config: ProxyConfig) -> anyhow::Result<Self> {
        let forwarder =
            HttpChatForwarder::new(&config).context("failed to build downstream HTTP client")?;

        let store = Arc::new(InMemorySessionStore::new().with_ttl(config.session_ttl()));
        let proxy = ChatProxy::new(store.clone(), Arc::new(forwarder), config.request_timeout());
        let scheduler =
            SessionCleanupScheduler::new(store, SystemClock, config.cleanup_interval());

        Ok(Self {
            proxy: Arc::new(proxy),
            scheduler: Arc::new(scheduler),
            config: Arc::new(config),
            started_at: Utc::now(),
        })
    }
}
