//! Time-filter DTOs.
//!
//! A time-filter search asks which of a set of known locations are reachable
//! within a travel time limit. Searches refer to locations by id; the
//! location list itself is shared by every search of a request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FullRange, Location, Property, Transportation};

/// One origin, many destinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartureSearch {
    pub id: String,
    pub departure_location_id: String,
    pub arrival_location_ids: Vec<String>,
    pub departure_time: DateTime<Utc>,
    /// Travel time limit in seconds.
    pub travel_time: u32,
    pub transportation: Transportation,
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<FullRange>,
}

/// Many origins, one destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalSearch {
    pub id: String,
    pub departure_location_ids: Vec<String>,
    pub arrival_location_id: String,
    pub arrival_time: DateTime<Utc>,
    /// Travel time limit in seconds.
    pub travel_time: u32,
    pub transportation: Transportation,
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<FullRange>,
}

/// `POST /time-filter` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeFilterRequest {
    pub locations: Vec<Location>,
    #[serde(default)]
    pub departure_searches: Vec<DepartureSearch>,
    #[serde(default)]
    pub arrival_searches: Vec<ArrivalSearch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeFilterResponse {
    pub results: Vec<TimeFilterResult>,
}

/// Reachable and unreachable locations for one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeFilterResult {
    pub search_id: String,
    pub locations: Vec<TimeFilterLocation>,
    #[serde(default)]
    pub unreachable: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeFilterLocation {
    pub id: String,
    /// One entry per journey when a range search was requested.
    pub properties: Vec<TimeFilterProperties>,
}

/// Requested properties; absent ones were not asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeFilterProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
}
