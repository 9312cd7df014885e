//! Sending bundle requests through a transport.
//!
//! Both modes return responses in bundle order and fail as a whole: a caller
//! never sees a partial set of responses.
//!
//! Cancellation is cooperative: dropping the future returned by
//! [`Dispatcher::dispatch`] drops every request still in flight.

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tracing::{debug, trace, warn};

use crate::error::{TransportError, TravelTimeError};
use crate::transport::{ApiRequest, RawResponse, Transport};

/// How bundle requests are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchMode {
    /// One request at a time, in bundle order. Stops at the first failure;
    /// later bundles are never sent.
    Sequential,
    /// All requests at once. Waits for every request to settle, then
    /// reports the failure with the lowest bundle index, if any.
    Concurrent,
}

/// Sends one request per bundle through a [`Transport`].
#[derive(Debug)]
pub struct Dispatcher<'t, T> {
    transport: &'t T,
    mode: DispatchMode,
}

impl<'t, T: Transport> Dispatcher<'t, T> {
    pub fn new(transport: &'t T, mode: DispatchMode) -> Self {
        Self { transport, mode }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Send `requests` (one per bundle, in bundle order) and return their
    /// responses in the same order.
    ///
    /// # Errors
    ///
    /// [`TravelTimeError::Transport`] for the first failed bundle by index.
    pub async fn dispatch(
        &self,
        requests: &[ApiRequest],
    ) -> Result<Vec<RawResponse>, TravelTimeError> {
        debug!(bundles = requests.len(), mode = ?self.mode, "Dispatching bundles");

        match self.mode {
            DispatchMode::Sequential => self.dispatch_sequential(requests).await,
            DispatchMode::Concurrent => self.dispatch_concurrent(requests).await,
        }
    }

    async fn dispatch_sequential(
        &self,
        requests: &[ApiRequest],
    ) -> Result<Vec<RawResponse>, TravelTimeError> {
        let mut responses = Vec::with_capacity(requests.len());

        for (bundle, request) in requests.iter().enumerate() {
            trace!(bundle, path = %request.path, "Sending bundle");
            let response = self
                .transport
                .send(request)
                .await
                .map_err(|source| bundle_failed(bundle, source))?;
            responses.push(response);
        }

        Ok(responses)
    }

    async fn dispatch_concurrent(
        &self,
        requests: &[ApiRequest],
    ) -> Result<Vec<RawResponse>, TravelTimeError> {
        let mut pending: FuturesUnordered<_> = requests
            .iter()
            .enumerate()
            .map(|(bundle, request)| async move {
                trace!(bundle, path = %request.path, "Sending bundle");
                (bundle, self.transport.send(request).await)
            })
            .collect();

        // Completion order is arbitrary; restore bundle order before
        // deciding the outcome.
        let mut settled = Vec::with_capacity(requests.len());
        while let Some(outcome) = pending.next().await {
            settled.push(outcome);
        }
        settled.sort_by_key(|(bundle, _)| *bundle);

        settled
            .into_iter()
            .map(|(bundle, result)| result.map_err(|source| bundle_failed(bundle, source)))
            .collect()
    }
}

fn bundle_failed(bundle: usize, source: TransportError) -> TravelTimeError {
    warn!(bundle, error = %source, "Bundle request failed");
    TravelTimeError::Transport { bundle, source }
}
