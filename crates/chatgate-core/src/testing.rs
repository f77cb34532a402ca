//! In-process fake of the downstream service for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chatgate_types::chat::{ChatOutcome, ChatReply};
use chatgate_types::error::ForwardFailure;

use crate::backend::{ChatBackend, ForwardRequest, SessionCreator};

/// Issues session ids `s1`, `s2`, ... and echoes messages back.
#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    pub created: AtomicUsize,
    pub sent: AtomicUsize,
    create_delay: Duration,
    create_failure: Mutex<Option<ForwardFailure>>,
    send_failure: Mutex<Option<ForwardFailure>>,
    rotate_to: Mutex<Option<String>>,
    probe_failure: Mutex<Option<ForwardFailure>>,
    last_request: Mutex<Option<ForwardRequest>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = delay;
        self
    }

    pub fn failing_create(self, failure: ForwardFailure) -> Self {
        self.set_create_failure(Some(failure));
        self
    }

    pub fn set_create_failure(&self, failure: Option<ForwardFailure>) {
        *self.create_failure.lock().unwrap() = failure;
    }

    pub fn set_send_failure(&self, failure: Option<ForwardFailure>) {
        *self.send_failure.lock().unwrap() = failure;
    }

    pub fn set_probe_failure(&self, failure: Option<ForwardFailure>) {
        *self.probe_failure.lock().unwrap() = failure;
    }

    /// Make the next successful replies carry a different session id.
    pub fn rotate_to(&self, session_id: &str) {
        *self.rotate_to.lock().unwrap() = Some(session_id.to_string());
    }

    pub fn last_request(&self) -> Option<ForwardRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl SessionCreator for FakeBackend {
    async fn create_session(&self) -> Result<String, ForwardFailure> {
        if !self.create_delay.is_zero() {
            tokio::time::sleep(self.create_delay).await;
        }
        if let Some(failure) = self.create_failure.lock().unwrap().clone() {
            return Err(failure);
        }
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("s{n}"))
    }
}

impl ChatBackend for FakeBackend {
    async fn send(&self, request: ForwardRequest) -> ChatOutcome {
        self.sent.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(failure) = self.send_failure.lock().unwrap().clone() {
            return ChatOutcome::Failure(failure);
        }

        let session_id = self
            .rotate_to
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(request.session_id);
        ChatOutcome::Success(ChatReply {
            session_id,
            reply: format!("echo: {}", request.message),
            sources: Vec::new(),
            metadata: Default::default(),
        })
    }

    async fn probe(&self) -> Result<(), ForwardFailure> {
        match self.probe_failure.lock().unwrap().clone() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        "fake://backend".to_string()
    }
}
