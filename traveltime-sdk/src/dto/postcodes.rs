//! Postcode time-filter DTOs (`POST /time-filter/postcodes`).
//!
//! Like a time-filter search, but the candidate destinations are every
//! postcode in the covered area rather than caller-supplied locations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinates, FullRange, Property, Transportation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartureSearch {
    pub id: String,
    pub coords: Coordinates,
    pub departure_time: DateTime<Utc>,
    pub travel_time: u32,
    pub transportation: Transportation,
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<FullRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalSearch {
    pub id: String,
    pub coords: Coordinates,
    pub arrival_time: DateTime<Utc>,
    pub travel_time: u32,
    pub transportation: Transportation,
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<FullRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostcodesRequest {
    #[serde(default)]
    pub departure_searches: Vec<DepartureSearch>,
    #[serde(default)]
    pub arrival_searches: Vec<ArrivalSearch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostcodesResponse {
    pub results: Vec<PostcodesResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostcodesResult {
    pub search_id: String,
    pub postcodes: Vec<Postcode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Postcode {
    pub code: String,
    pub properties: Vec<PostcodeProperties>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostcodeProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
}
