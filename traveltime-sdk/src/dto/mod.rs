//! Request and response DTOs.
//!
//! These types map directly to the TravelTime JSON API. Request types are
//! built by the caller and never mutated by the client; response types use
//! `Option` and `#[serde(default)]` for fields the API omits.

pub mod geocoding;
pub mod map_info;
pub mod postcodes;
pub mod routes;
pub mod time_filter;
pub mod time_map;
pub mod transportation;

use serde::{Deserialize, Serialize};

pub use transportation::Transportation;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A named point referenced by id from time-filter and routes searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub coords: Coordinates,
}

impl Location {
    pub fn new(id: impl Into<String>, coords: Coordinates) -> Self {
        Self {
            id: id.into(),
            coords,
        }
    }
}

/// Departure (or arrival) time range for time-map searches.
///
/// With `enabled`, the search considers every departure within `width`
/// seconds after the given time rather than that instant only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub enabled: bool,
    pub width: u32,
}

/// Time range for time-filter, postcodes and routes searches, additionally
/// capping how many results are returned per location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullRange {
    pub enabled: bool,
    pub max_results: u32,
    pub width: u32,
}

/// Shape simplification for time-map results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scale_type", rename_all = "snake_case")]
pub enum LevelOfDetail {
    /// Named detail level.
    Simple { level: DetailLevel },
    /// Numeric detail level, -8 (coarsest) to 2.
    SimpleNumeric { level: i8 },
    /// Shapes snapped to a grid of squares `square_size` metres wide.
    CoarseGrid { square_size: u32 },
}

/// Named levels for [`LevelOfDetail::Simple`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Lowest,
    Low,
    Medium,
    High,
    Highest,
}

/// Properties a time-filter, postcodes or routes search may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    TravelTime,
    Distance,
    Route,
    Fares,
}

/// A latitude/longitude bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl Rectangle {
    pub fn new(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            min_lng,
            max_lat,
            max_lng,
        }
    }

    /// The `min_lat,min_lng,max_lat,max_lng` form used in query strings.
    pub fn to_bounds(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lat, self.min_lng, self.max_lat, self.max_lng
        )
    }
}
