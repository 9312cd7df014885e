//! Blocking TravelTime client.
//!
//! Drives the async client on an owned Tokio runtime, so splitting,
//! dispatch and merging behave exactly as in [`crate::client`].
//!
//! # Runtime behaviour
//!
//! Called from outside any Tokio runtime, the client uses its own
//! current-thread runtime. Called from inside a multi-threaded runtime it
//! blocks on that runtime's handle through
//! [`tokio::task::block_in_place`]. Inside a current-thread runtime there is
//! no thread to hand off to, so every call fails with
//! [`TravelTimeError::Runtime`].
//!
//! The client may be created and dropped anywhere, including inside async
//! code.

use std::future::Future;
use std::io;

use geojson::FeatureCollection;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use crate::batch::{BatchedRequest, DispatchMode};
use crate::client;
use crate::config::ClientConfig;
use crate::dto::Location;
use crate::dto::geocoding::GeocodingQuery;
use crate::dto::map_info::MapInfoResponse;
use crate::dto::postcodes::{self, PostcodesResponse};
use crate::dto::routes::{self, RoutesResponse};
use crate::dto::time_filter::{self, TimeFilterResponse};
use crate::dto::time_map::{self, TimeMapOptions, TimeMapResponse};
use crate::error::TravelTimeError;
use crate::transport::{HttpTransport, Transport};

/// Synchronous client for the TravelTime API.
///
/// Bundles are dispatched sequentially unless the config asks for
/// [`DispatchMode::Concurrent`].
pub struct TravelTimeClient<T = HttpTransport> {
    inner: client::TravelTimeClient<T>,
    /// Taken on drop.
    runtime: Option<Runtime>,
}

impl<T> Drop for TravelTimeClient<T> {
    fn drop(&mut self) {
        // A plain drop blocks, which panics inside async code.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for TravelTimeClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelTimeClient")
            .field("inner", &self.inner)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl TravelTimeClient<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, TravelTimeError> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(&config, transport)
    }
}

impl<T: Transport> TravelTimeClient<T> {
    /// Create a client over an arbitrary transport.
    ///
    /// # Errors
    ///
    /// [`TravelTimeError::InvalidConfiguration`] for an invalid config,
    /// [`TravelTimeError::Runtime`] if the runtime cannot be built.
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self, TravelTimeError> {
        let mode = config.dispatch_mode.unwrap_or(DispatchMode::Sequential);
        let inner =
            client::TravelTimeClient::with_transport(config, transport)?.with_dispatch_mode(mode);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            inner,
            runtime: Some(runtime),
        })
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        self.inner.dispatch_mode()
    }

    pub fn window_size(&self) -> usize {
        self.inner.window_size()
    }

    pub fn transport(&self) -> &T {
        self.inner.transport()
    }

    pub fn map_info(&self) -> Result<MapInfoResponse, TravelTimeError> {
        self.block_on(self.inner.map_info())
    }

    pub fn time_map(
        &self,
        departures: Vec<time_map::DepartureSearch>,
        arrivals: Vec<time_map::ArrivalSearch>,
        options: TimeMapOptions,
    ) -> Result<TimeMapResponse, TravelTimeError> {
        self.block_on(self.inner.time_map(departures, arrivals, options))
    }

    pub fn time_map_geojson(
        &self,
        departures: Vec<time_map::DepartureSearch>,
        arrivals: Vec<time_map::ArrivalSearch>,
    ) -> Result<FeatureCollection, TravelTimeError> {
        self.block_on(self.inner.time_map_geojson(departures, arrivals))
    }

    pub fn time_filter(
        &self,
        locations: Vec<Location>,
        departures: Vec<time_filter::DepartureSearch>,
        arrivals: Vec<time_filter::ArrivalSearch>,
    ) -> Result<TimeFilterResponse, TravelTimeError> {
        self.block_on(self.inner.time_filter(locations, departures, arrivals))
    }

    pub fn time_filter_postcodes(
        &self,
        departures: Vec<postcodes::DepartureSearch>,
        arrivals: Vec<postcodes::ArrivalSearch>,
    ) -> Result<PostcodesResponse, TravelTimeError> {
        self.block_on(self.inner.time_filter_postcodes(departures, arrivals))
    }

    pub fn routes(
        &self,
        locations: Vec<Location>,
        departures: Vec<routes::DepartureSearch>,
        arrivals: Vec<routes::ArrivalSearch>,
    ) -> Result<RoutesResponse, TravelTimeError> {
        self.block_on(self.inner.routes(locations, departures, arrivals))
    }

    pub fn geocoding(&self, query: &GeocodingQuery) -> Result<FeatureCollection, TravelTimeError> {
        self.block_on(self.inner.geocoding(query))
    }

    pub fn geocoding_reverse(
        &self,
        lat: f64,
        lng: f64,
        within_countries: &[&str],
    ) -> Result<FeatureCollection, TravelTimeError> {
        self.block_on(self.inner.geocoding_reverse(lat, lng, within_countries))
    }

    /// Blocking form of [`client::TravelTimeClient::execute`].
    pub fn execute<R: BatchedRequest>(&self, request: &R) -> Result<R::Response, TravelTimeError> {
        self.block_on(self.inner.execute(request))
    }

    fn block_on<O>(
        &self,
        future: impl Future<Output = Result<O, TravelTimeError>>,
    ) -> Result<O, TravelTimeError> {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            Ok(_) => Err(TravelTimeError::Runtime(io::Error::new(
                io::ErrorKind::Unsupported,
                "blocking client called from inside a current-thread runtime",
            ))),
            Err(_) => match &self.runtime {
                Some(runtime) => runtime.block_on(future),
                None => Err(TravelTimeError::Runtime(io::Error::other("runtime shut down"))),
            },
        }
    }
}
