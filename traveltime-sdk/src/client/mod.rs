//! Async TravelTime client.
//!
//! Batched endpoints run through [`TravelTimeClient::execute`]: validate,
//! split into bundles of at most `window_size` searches, dispatch one request
//! per bundle, decode every response, merge. The remaining endpoints are
//! single calls.

use geojson::FeatureCollection;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::AcceptType;
use crate::batch::{BatchedRequest, DispatchMode, Dispatcher, Merge};
use crate::config::ClientConfig;
use crate::dto::Location;
use crate::dto::geocoding::{GeocodingQuery, ReverseGeocodingQuery};
use crate::dto::map_info::MapInfoResponse;
use crate::dto::postcodes::{self, PostcodesRequest, PostcodesResponse};
use crate::dto::routes::{self, RoutesRequest, RoutesResponse};
use crate::dto::time_filter::{self, TimeFilterRequest, TimeFilterResponse};
use crate::dto::time_map::{
    self, TimeMapGeoJsonRequest, TimeMapOptions, TimeMapRequest, TimeMapResponse,
};
use crate::error::{TravelTimeError, excerpt};
use crate::transport::{ApiRequest, HttpTransport, Transport};

#[cfg(test)]
mod tests;

/// Async client for the TravelTime API.
///
/// Generic over the [`Transport`] so tests and embedders can substitute
/// their own; [`TravelTimeClient::new`] uses [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TravelTimeClient<T = HttpTransport> {
    transport: T,
    window_size: usize,
    dispatch_mode: DispatchMode,
}

impl TravelTimeClient<HttpTransport> {
    /// Create a client that talks HTTP to `config.base_url`.
    ///
    /// Bundles are dispatched concurrently unless the config says otherwise.
    pub fn new(config: ClientConfig) -> Result<Self, TravelTimeError> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(&config, transport)
    }
}

impl<T: Transport> TravelTimeClient<T> {
    /// Create a client over an arbitrary transport. Only the batching
    /// settings of `config` are used; credentials and connection settings
    /// belong to the transport.
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self, TravelTimeError> {
        config.validate()?;
        Ok(Self {
            transport,
            window_size: config.window_size,
            dispatch_mode: config.dispatch_mode.unwrap_or(DispatchMode::Concurrent),
        })
    }

    /// Override the dispatch mode.
    pub fn with_dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.dispatch_mode = mode;
        self
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        self.dispatch_mode
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Maps covered by the service and the features each supports.
    pub async fn map_info(&self) -> Result<MapInfoResponse, TravelTimeError> {
        self.fetch(ApiRequest::get("map-info", AcceptType::Json)).await
    }

    /// Reachable areas as shapes, one result per search plus one per union
    /// and intersection.
    pub async fn time_map(
        &self,
        departures: Vec<time_map::DepartureSearch>,
        arrivals: Vec<time_map::ArrivalSearch>,
        options: TimeMapOptions,
    ) -> Result<TimeMapResponse, TravelTimeError> {
        self.execute(&TimeMapRequest {
            departure_searches: departures,
            arrival_searches: arrivals,
            options,
        })
        .await
    }

    /// Reachable areas as a GeoJSON `FeatureCollection`, one feature per
    /// search in search order.
    pub async fn time_map_geojson(
        &self,
        departures: Vec<time_map::DepartureSearch>,
        arrivals: Vec<time_map::ArrivalSearch>,
    ) -> Result<FeatureCollection, TravelTimeError> {
        self.execute(&TimeMapGeoJsonRequest {
            departure_searches: departures,
            arrival_searches: arrivals,
        })
        .await
    }

    /// Travel times and distances between declared locations.
    pub async fn time_filter(
        &self,
        locations: Vec<Location>,
        departures: Vec<time_filter::DepartureSearch>,
        arrivals: Vec<time_filter::ArrivalSearch>,
    ) -> Result<TimeFilterResponse, TravelTimeError> {
        self.execute(&TimeFilterRequest {
            locations,
            departure_searches: departures,
            arrival_searches: arrivals,
        })
        .await
    }

    /// Postcodes reachable from (or that can reach) each search's point.
    pub async fn time_filter_postcodes(
        &self,
        departures: Vec<postcodes::DepartureSearch>,
        arrivals: Vec<postcodes::ArrivalSearch>,
    ) -> Result<PostcodesResponse, TravelTimeError> {
        self.execute(&PostcodesRequest {
            departure_searches: departures,
            arrival_searches: arrivals,
        })
        .await
    }

    /// Routes between declared locations.
    pub async fn routes(
        &self,
        locations: Vec<Location>,
        departures: Vec<routes::DepartureSearch>,
        arrivals: Vec<routes::ArrivalSearch>,
    ) -> Result<RoutesResponse, TravelTimeError> {
        self.execute(&RoutesRequest {
            locations,
            departure_searches: departures,
            arrival_searches: arrivals,
        })
        .await
    }

    /// Forward geocoding.
    pub async fn geocoding(
        &self,
        query: &GeocodingQuery,
    ) -> Result<FeatureCollection, TravelTimeError> {
        let request =
            ApiRequest::get("geocoding/search", AcceptType::Json).with_query(query.to_query());
        self.fetch(request).await
    }

    /// Reverse geocoding of a single point.
    pub async fn geocoding_reverse(
        &self,
        lat: f64,
        lng: f64,
        within_countries: &[&str],
    ) -> Result<FeatureCollection, TravelTimeError> {
        let query = ReverseGeocodingQuery::new(lat, lng)
            .within_countries(within_countries.iter().copied());
        let request =
            ApiRequest::get("geocoding/reverse", AcceptType::Json).with_query(query.to_query());
        self.fetch(request).await
    }

    /// Run a batched request end to end.
    ///
    /// The result is the merge of every bundle's response, in bundle order.
    /// Any failure fails the whole call; partial results are never
    /// returned.
    ///
    /// # Errors
    ///
    /// * [`TravelTimeError::InvalidConfiguration`] before anything is sent
    /// * [`TravelTimeError::Transport`] for the failed bundle
    /// * [`TravelTimeError::MalformedResponse`] if a body does not decode
    pub async fn execute<R: BatchedRequest>(
        &self,
        request: &R,
    ) -> Result<R::Response, TravelTimeError> {
        request.validate()?;

        let api_requests = request
            .split_requests(self.window_size)?
            .iter()
            .map(BatchedRequest::to_api_request)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            path = R::PATH,
            departures = request.departures().len(),
            arrivals = request.arrivals().len(),
            bundles = api_requests.len(),
            window_size = self.window_size,
            "Executing batched request"
        );

        let responses = Dispatcher::new(&self.transport, self.dispatch_mode)
            .dispatch(&api_requests)
            .await?;

        let parts = responses
            .iter()
            .enumerate()
            .map(|(bundle, response)| decode(bundle, &response.body))
            .collect::<Result<Vec<R::Response>, _>>()?;

        Ok(<R::Response as Merge>::merge(parts))
    }

    /// Send one unbatched request and decode its body.
    async fn fetch<Resp: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Resp, TravelTimeError> {
        debug!(path = %request.path, "Fetching");
        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|source| TravelTimeError::Transport { bundle: 0, source })?;
        decode(0, &response.body)
    }
}

fn decode<Resp: DeserializeOwned>(bundle: usize, body: &str) -> Result<Resp, TravelTimeError> {
    serde_json::from_str(body).map_err(|e| TravelTimeError::MalformedResponse {
        bundle,
        message: e.to_string(),
        body: Some(excerpt(body)),
    })
}
