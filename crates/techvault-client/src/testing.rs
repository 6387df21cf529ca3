//! Test double for [`Transport`].
//!
//! [`ScriptedTransport`] replays queued responses in order and records
//! every request it receives, so tests can assert on the exact wire
//! traffic (paths, bodies, bearer tokens) without a server.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use techvault_core::error::{VaultError, VaultResult};
use techvault_core::http::{HttpRequest, HttpResponse, Transport};

enum Scripted {
    Response(HttpResponse),
    TransportError(String),
}

#[derive(Default)]
struct State {
    queue: VecDeque<Scripted>,
    requests: Vec<HttpRequest>,
}

/// Cloneable handle; all clones share one script and one request log.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<State>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: HttpResponse) -> &Self {
        self.lock().queue.push_back(Scripted::Response(response));
        self
    }

    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push(HttpResponse::json(status, &body))
    }

    /// Queue a network-level failure (connection refused, timeout).
    pub fn push_transport_error(&self, message: impl Into<String>) -> &Self {
        self.lock()
            .queue
            .push_back(Scripted::TransportError(message.into()));
        self
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    /// Paths of every request received so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.lock().requests.iter().map(|r| r.path.clone()).collect()
    }

    /// Responses still waiting to be served.
    pub fn remaining(&self) -> usize {
        self.lock().queue.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panicking test poisons the lock; later assertions still want the log.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> VaultResult<HttpResponse> {
        let mut state = self.lock();
        let summary = format!("{} {}", request.method, request.path);
        state.requests.push(request);
        match state.queue.pop_front() {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::TransportError(message)) => Err(VaultError::Transport(message)),
            None => Err(VaultError::Transport(format!(
                "no scripted response for {summary}"
            ))),
        }
    }
}
