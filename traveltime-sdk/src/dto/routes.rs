//! Routes DTOs (`POST /routes`).
//!
//! Searches have the same shape as time-filter searches minus the travel time
//! limit; results can carry the full itinerary of each journey.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinates, FullRange, Location, Property, Transportation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartureSearch {
    pub id: String,
    pub departure_location_id: String,
    pub arrival_location_ids: Vec<String>,
    pub departure_time: DateTime<Utc>,
    pub transportation: Transportation,
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<FullRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalSearch {
    pub id: String,
    pub departure_location_ids: Vec<String>,
    pub arrival_location_id: String,
    pub arrival_time: DateTime<Utc>,
    pub transportation: Transportation,
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<FullRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutesRequest {
    pub locations: Vec<Location>,
    #[serde(default)]
    pub departure_searches: Vec<DepartureSearch>,
    #[serde(default)]
    pub arrival_searches: Vec<ArrivalSearch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutesResponse {
    pub results: Vec<RoutesResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutesResult {
    pub search_id: String,
    pub locations: Vec<RouteLocation>,
    #[serde(default)]
    pub unreachable: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLocation {
    pub id: String,
    pub properties: Vec<RouteProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
}

/// A journey itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub parts: Vec<RoutePart>,
}

/// One leg of a route: a walk, a ride, a change, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePart {
    /// Part kind as reported by the API (`basic`, `start_end`, `road`, `public_transport`).
    #[serde(rename = "type")]
    pub kind: String,
    pub mode: String,
    #[serde(default)]
    pub directions: String,
    /// Metres.
    pub distance: u32,
    /// Seconds.
    pub travel_time: u32,
    #[serde(default)]
    pub coords: Vec<Coordinates>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_with_route_deserialization() {
        let json = r#"{
            "results": [{
                "search_id": "s1",
                "locations": [{
                    "id": "dest",
                    "properties": [{
                        "travel_time": 600,
                        "route": {
                            "departure_time": "2024-03-15T08:00:00Z",
                            "arrival_time": "2024-03-15T08:10:00Z",
                            "parts": [{
                                "id": 0,
                                "type": "start_end",
                                "mode": "walk",
                                "directions": "Start your journey",
                                "distance": 120,
                                "travel_time": 90,
                                "coords": [{"lat": 51.5, "lng": -0.1}]
                            }]
                        }
                    }]
                }],
                "unreachable": []
            }]
        }"#;

        let response: RoutesResponse = serde_json::from_str(json).unwrap();
        let props = &response.results[0].locations[0].properties[0];

        assert_eq!(props.travel_time, Some(600));
        let route = props.route.as_ref().unwrap();
        assert_eq!(route.parts.len(), 1);
        assert_eq!(route.parts[0].kind, "start_end");
        assert_eq!(route.parts[0].distance, 120);
    }
}
