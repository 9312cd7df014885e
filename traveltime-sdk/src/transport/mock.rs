//! Mock transport for testing without API access.
//!
//! Answers every request with a caller-supplied closure, optionally after a
//! per-request delay, and records what was sent.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::error::TransportError;

use super::{ApiRequest, RawResponse, Transport};

type Responder = dyn Fn(&ApiRequest) -> Result<RawResponse, TransportError> + Send + Sync;
type Latency = dyn Fn(&ApiRequest) -> Duration + Send + Sync;

/// Mock transport that answers requests from a closure.
///
/// Cloning shares the request log and counters, so a test can keep a handle
/// after moving the transport into a client.
#[derive(Clone)]
pub struct MockTransport {
    responder: Arc<Responder>,
    latency: Option<Arc<Latency>>,
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    requests: Mutex<Vec<ApiRequest>>,
    in_flight: AtomicUsize,
    completed: AtomicUsize,
}

/// Decrements the in-flight counter when a send finishes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockTransport {
    /// Create a mock that answers every request with `responder`.
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<RawResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            latency: None,
            state: Arc::new(MockState::default()),
        }
    }

    /// Create a mock that answers every request with `200 OK` and `body`.
    pub fn with_body(body: impl Into<String>) -> Self {
        let body = body.into();
        Self::new(move |_| Ok(RawResponse::ok(body.clone())))
    }

    /// Delay each response by the duration computed for its request.
    pub fn with_latency(
        mut self,
        latency: impl Fn(&ApiRequest) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.latency = Some(Arc::new(latency));
        self
    }

    /// Requests received so far, in the order sends started.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of sends started.
    pub fn call_count(&self) -> usize {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of sends started but neither finished nor dropped.
    pub fn in_flight(&self) -> usize {
        self.state.in_flight.load(Ordering::SeqCst)
    }

    /// Number of sends that ran to completion.
    pub fn completed(&self) -> usize {
        self.state.completed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("calls", &self.call_count())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let _guard = InFlight::enter(&self.state.in_flight);

        if let Some(latency) = &self.latency {
            let delay = latency(request);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let result = (self.responder)(request);
        self.state.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}
