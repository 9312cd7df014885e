//! Endpoint requests that can be split into bundles.
//!
//! [`BatchedRequest`] ties a request body to its endpoint, its response type
//! and the options every bundle must carry. The client drives any
//! implementor through the same validate → split → dispatch → merge path.

use std::collections::HashSet;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::merge::Merge;
use super::split::{Bundle, split};
use crate::auth::AcceptType;
use crate::dto::{Location, postcodes, routes, time_filter, time_map};
use crate::error::TravelTimeError;
use crate::transport::ApiRequest;

/// A single search with a caller-assigned id.
pub trait SearchItem {
    fn search_id(&self) -> &str;
}

macro_rules! impl_search_item {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl SearchItem for $ty {
                fn search_id(&self) -> &str {
                    &self.id
                }
            }
        )+
    };
}

impl_search_item!(
    time_map::DepartureSearch,
    time_map::ArrivalSearch,
    time_filter::DepartureSearch,
    time_filter::ArrivalSearch,
    postcodes::DepartureSearch,
    postcodes::ArrivalSearch,
    routes::DepartureSearch,
    routes::ArrivalSearch,
);

/// A request body holding departure and arrival searches plus options shared
/// by all of them.
pub trait BatchedRequest: Serialize + Sized {
    type Departure: SearchItem + Clone;
    type Arrival: SearchItem + Clone;
    type Response: DeserializeOwned + Merge;

    /// Endpoint path relative to the base URL.
    const PATH: &'static str;
    const ACCEPT: AcceptType;

    fn departures(&self) -> &[Self::Departure];
    fn arrivals(&self) -> &[Self::Arrival];

    /// The request for one bundle: the bundle's searches plus a verbatim
    /// copy of every shared option.
    fn build(&self, bundle: &Bundle<'_, Self::Departure, Self::Arrival>) -> Self;

    /// Check the shared options against the declared search ids.
    fn validate_shared(&self, _search_ids: &HashSet<&str>) -> Result<(), TravelTimeError> {
        Ok(())
    }

    /// Reject requests the service would refuse or that could not be
    /// merged back unambiguously. Runs before anything is sent.
    fn validate(&self) -> Result<(), TravelTimeError> {
        let ids = self
            .departures()
            .iter()
            .map(SearchItem::search_id)
            .chain(self.arrivals().iter().map(SearchItem::search_id));

        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                return Err(TravelTimeError::config(format!(
                    "duplicate search id {id:?}"
                )));
            }
        }

        self.validate_shared(&seen)
    }

    /// One request per bundle, in bundle order.
    fn split_requests(&self, window_size: usize) -> Result<Vec<Self>, TravelTimeError> {
        let bundles = split(self.departures(), self.arrivals(), window_size)?;
        Ok(bundles.iter().map(|bundle| self.build(bundle)).collect())
    }

    fn to_api_request(&self) -> Result<ApiRequest, TravelTimeError> {
        let body = serde_json::to_value(self).map_err(|e| {
            TravelTimeError::config(format!("failed to serialize {} request: {e}", Self::PATH))
        })?;
        Ok(ApiRequest::post(Self::PATH, Self::ACCEPT, body))
    }
}

impl BatchedRequest for time_map::TimeMapRequest {
    type Departure = time_map::DepartureSearch;
    type Arrival = time_map::ArrivalSearch;
    type Response = time_map::TimeMapResponse;

    const PATH: &'static str = "time-map";
    const ACCEPT: AcceptType = AcceptType::Json;

    fn departures(&self) -> &[Self::Departure] {
        &self.departure_searches
    }

    fn arrivals(&self) -> &[Self::Arrival] {
        &self.arrival_searches
    }

    fn build(&self, bundle: &Bundle<'_, Self::Departure, Self::Arrival>) -> Self {
        Self {
            departure_searches: bundle.departures.to_vec(),
            arrival_searches: bundle.arrivals.to_vec(),
            options: self.options.clone(),
        }
    }

    fn validate_shared(&self, search_ids: &HashSet<&str>) -> Result<(), TravelTimeError> {
        for (id, referenced) in self.options.references() {
            if referenced.is_empty() {
                return Err(TravelTimeError::config(format!(
                    "{id:?} combines no searches"
                )));
            }
            if let Some(unknown) = referenced.iter().find(|s| !search_ids.contains(s.as_str())) {
                return Err(TravelTimeError::config(format!(
                    "{id:?} references unknown search {unknown:?}"
                )));
            }
        }
        Ok(())
    }
}

impl BatchedRequest for time_map::TimeMapGeoJsonRequest {
    type Departure = time_map::DepartureSearch;
    type Arrival = time_map::ArrivalSearch;
    type Response = geojson::FeatureCollection;

    const PATH: &'static str = "time-map";
    const ACCEPT: AcceptType = AcceptType::GeoJson;

    fn departures(&self) -> &[Self::Departure] {
        &self.departure_searches
    }

    fn arrivals(&self) -> &[Self::Arrival] {
        &self.arrival_searches
    }

    fn build(&self, bundle: &Bundle<'_, Self::Departure, Self::Arrival>) -> Self {
        Self {
            departure_searches: bundle.departures.to_vec(),
            arrival_searches: bundle.arrivals.to_vec(),
        }
    }
}

impl BatchedRequest for time_filter::TimeFilterRequest {
    type Departure = time_filter::DepartureSearch;
    type Arrival = time_filter::ArrivalSearch;
    type Response = time_filter::TimeFilterResponse;

    const PATH: &'static str = "time-filter";
    const ACCEPT: AcceptType = AcceptType::Json;

    fn departures(&self) -> &[Self::Departure] {
        &self.departure_searches
    }

    fn arrivals(&self) -> &[Self::Arrival] {
        &self.arrival_searches
    }

    fn build(&self, bundle: &Bundle<'_, Self::Departure, Self::Arrival>) -> Self {
        Self {
            locations: self.locations.clone(),
            departure_searches: bundle.departures.to_vec(),
            arrival_searches: bundle.arrivals.to_vec(),
        }
    }

    fn validate_shared(&self, _search_ids: &HashSet<&str>) -> Result<(), TravelTimeError> {
        check_locations(&self.locations, &self.departure_searches, &self.arrival_searches)
    }
}

impl BatchedRequest for postcodes::PostcodesRequest {
    type Departure = postcodes::DepartureSearch;
    type Arrival = postcodes::ArrivalSearch;
    type Response = postcodes::PostcodesResponse;

    const PATH: &'static str = "time-filter/postcodes";
    const ACCEPT: AcceptType = AcceptType::Json;

    fn departures(&self) -> &[Self::Departure] {
        &self.departure_searches
    }

    fn arrivals(&self) -> &[Self::Arrival] {
        &self.arrival_searches
    }

    fn build(&self, bundle: &Bundle<'_, Self::Departure, Self::Arrival>) -> Self {
        Self {
            departure_searches: bundle.departures.to_vec(),
            arrival_searches: bundle.arrivals.to_vec(),
        }
    }
}

impl BatchedRequest for routes::RoutesRequest {
    type Departure = routes::DepartureSearch;
    type Arrival = routes::ArrivalSearch;
    type Response = routes::RoutesResponse;

    const PATH: &'static str = "routes";
    const ACCEPT: AcceptType = AcceptType::Json;

    fn departures(&self) -> &[Self::Departure] {
        &self.departure_searches
    }

    fn arrivals(&self) -> &[Self::Arrival] {
        &self.arrival_searches
    }

    fn build(&self, bundle: &Bundle<'_, Self::Departure, Self::Arrival>) -> Self {
        Self {
            locations: self.locations.clone(),
            departure_searches: bundle.departures.to_vec(),
            arrival_searches: bundle.arrivals.to_vec(),
        }
    }

    fn validate_shared(&self, _search_ids: &HashSet<&str>) -> Result<(), TravelTimeError> {
        check_locations(&self.locations, &self.departure_searches, &self.arrival_searches)
    }
}

/// A search that points at entries of a shared location list.
trait LocationRefs: SearchItem {
    fn location_ids(&self) -> Vec<&str>;
}

macro_rules! impl_location_refs {
    (departure: $($dep:ty),+; arrival: $($arr:ty),+) => {
        $(
            impl LocationRefs for $dep {
                fn location_ids(&self) -> Vec<&str> {
                    std::iter::once(&self.departure_location_id)
                        .chain(&self.arrival_location_ids)
                        .map(String::as_str)
                        .collect()
                }
            }
        )+
        $(
            impl LocationRefs for $arr {
                fn location_ids(&self) -> Vec<&str> {
                    self.departure_location_ids
                        .iter()
                        .chain(std::iter::once(&self.arrival_location_id))
                        .map(String::as_str)
                        .collect()
                }
            }
        )+
    };
}

impl_location_refs!(
    departure: time_filter::DepartureSearch, routes::DepartureSearch;
    arrival: time_filter::ArrivalSearch, routes::ArrivalSearch
);

/// Every location a search points at must be declared, once, in the
/// shared location list.
fn check_locations<D: LocationRefs, A: LocationRefs>(
    locations: &[Location],
    departures: &[D],
    arrivals: &[A],
) -> Result<(), TravelTimeError> {
    let mut declared = HashSet::with_capacity(locations.len());
    for location in locations {
        if !declared.insert(location.id.as_str()) {
            return Err(TravelTimeError::config(format!(
                "duplicate location id {:?}",
                location.id
            )));
        }
    }

    let searches = departures
        .iter()
        .map(|s| (s.search_id(), s.location_ids()))
        .chain(arrivals.iter().map(|s| (s.search_id(), s.location_ids())));

    for (search, location_ids) in searches {
        if let Some(unknown) = location_ids.iter().find(|l| !declared.contains(*l)) {
            return Err(TravelTimeError::config(format!(
                "search {search:?} references unknown location {unknown:?}"
            )));
        }
    }
    Ok(())
}
