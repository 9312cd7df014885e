//! Time-map (isochrone) DTOs.
//!
//! A time-map search returns the area reachable from (or that can reach) a
//! point within a travel time limit. Results come back either as keyed
//! shapes ([`TimeMapResponse`]) or, when GeoJSON is requested, as a
//! `FeatureCollection` with one feature per search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinates, LevelOfDetail, Range, Transportation};

/// Search for the area reachable from `coords`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartureSearch {
    pub id: String,
    pub coords: Coordinates,
    pub departure_time: DateTime<Utc>,
    /// Travel time limit in seconds.
    pub travel_time: u32,
    pub transportation: Transportation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_of_detail: Option<LevelOfDetail>,
}

impl DepartureSearch {
    pub fn new(
        id: impl Into<String>,
        coords: Coordinates,
        departure_time: DateTime<Utc>,
        travel_time: u32,
        transportation: Transportation,
    ) -> Self {
        Self {
            id: id.into(),
            coords,
            departure_time,
            travel_time,
            transportation,
            range: None,
            level_of_detail: None,
        }
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_level_of_detail(mut self, level: LevelOfDetail) -> Self {
        self.level_of_detail = Some(level);
        self
    }
}

/// Search for the area from which `coords` can be reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalSearch {
    pub id: String,
    pub coords: Coordinates,
    pub arrival_time: DateTime<Utc>,
    /// Travel time limit in seconds.
    pub travel_time: u32,
    pub transportation: Transportation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_of_detail: Option<LevelOfDetail>,
}

impl ArrivalSearch {
    pub fn new(
        id: impl Into<String>,
        coords: Coordinates,
        arrival_time: DateTime<Utc>,
        travel_time: u32,
        transportation: Transportation,
    ) -> Self {
        Self {
            id: id.into(),
            coords,
            arrival_time,
            travel_time,
            transportation,
            range: None,
            level_of_detail: None,
        }
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_level_of_detail(mut self, level: LevelOfDetail) -> Self {
        self.level_of_detail = Some(level);
        self
    }
}

/// Combine the shapes of several searches into their union, reported as an
/// extra result keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Union {
    pub id: String,
    pub search_ids: Vec<String>,
}

/// Combine the shapes of several searches into their intersection, reported
/// as an extra result keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intersection {
    pub id: String,
    pub search_ids: Vec<String>,
}

impl Union {
    pub fn new<I, S>(id: impl Into<String>, search_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            search_ids: search_ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl Intersection {
    pub fn new<I, S>(id: impl Into<String>, search_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            search_ids: search_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Options shared by every search of a time-map request.
///
/// When a request is split into several bundles these are copied verbatim
/// into each of them; only the search lists differ between bundles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeMapOptions {
    /// Unions of search shapes. Each is evaluated by the service and
    /// returned as an additional result.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unions: Vec<Union>,

    /// Intersections of search shapes, returned like unions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intersections: Vec<Intersection>,
}

impl TimeMapOptions {
    pub fn with_union(mut self, union: Union) -> Self {
        self.unions.push(union);
        self
    }

    pub fn with_intersection(mut self, intersection: Intersection) -> Self {
        self.intersections.push(intersection);
        self
    }

    /// Every search id referenced by a union or intersection, with the id
    /// of the referencing entry.
    pub(crate) fn references(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.unions
            .iter()
            .map(|u| (u.id.as_str(), u.search_ids.as_slice()))
            .chain(
                self.intersections
                    .iter()
                    .map(|i| (i.id.as_str(), i.search_ids.as_slice())),
            )
    }
}

/// `POST /time-map` body for the JSON response format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeMapRequest {
    #[serde(default)]
    pub departure_searches: Vec<DepartureSearch>,
    #[serde(default)]
    pub arrival_searches: Vec<ArrivalSearch>,
    #[serde(flatten)]
    pub options: TimeMapOptions,
}

/// `POST /time-map` body for the GeoJSON response format.
///
/// Unions and intersections are not available in this format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeMapGeoJsonRequest {
    #[serde(default)]
    pub departure_searches: Vec<DepartureSearch>,
    #[serde(default)]
    pub arrival_searches: Vec<ArrivalSearch>,
}

/// Response to a JSON time-map request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeMapResponse {
    pub results: Vec<TimeMapResult>,
}

/// Shapes for one search, union or intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeMapResult {
    pub search_id: String,
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub properties: TimeMapProperties,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeMapProperties {
    /// Set when the whole shape is reachable on foot alone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_only_walking: Option<bool>,
}

/// A polygon: outer ring plus any holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub shell: Vec<Coordinates>,
    #[serde(default)]
    pub holes: Vec<Vec<Coordinates>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn departure_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap()
    }

    #[test]
    fn request_serialization() {
        let request = TimeMapRequest {
            departure_searches: vec![
                DepartureSearch::new(
                    "dep",
                    Coordinates::new(51.507, -0.128),
                    departure_time(),
                    900,
                    Transportation::Walking,
                )
                .with_range(Range {
                    enabled: true,
                    width: 3600,
                }),
            ],
            arrival_searches: vec![],
            options: TimeMapOptions::default().with_union(Union::new("u", ["dep"])),
        };

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["departure_searches"][0]["id"], "dep");
        assert_eq!(
            value["departure_searches"][0]["departure_time"],
            "2024-03-15T08:00:00Z"
        );
        assert_eq!(
            value["departure_searches"][0]["range"],
            json!({"enabled": true, "width": 3600})
        );
        assert!(value["departure_searches"][0].get("level_of_detail").is_none());
        assert_eq!(value["arrival_searches"], json!([]));
        assert_eq!(value["unions"], json!([{"id": "u", "search_ids": ["dep"]}]));
        assert!(value.get("intersections").is_none());
    }

    #[test]
    fn response_deserialization() {
        let json = r#"{
            "results": [{
                "search_id": "dep",
                "shapes": [{
                    "shell": [
                        {"lat": 51.5, "lng": -0.1},
                        {"lat": 51.6, "lng": -0.1},
                        {"lat": 51.6, "lng": 0.0}
                    ],
                    "holes": []
                }],
                "properties": {"is_only_walking": false}
            }, {
                "search_id": "arr",
                "shapes": []
            }]
        }"#;

        let response: TimeMapResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].shapes[0].shell.len(), 3);
        assert_eq!(response.results[0].properties.is_only_walking, Some(false));
        assert_eq!(response.results[1].properties, TimeMapProperties::default());
    }

    #[test]
    fn options_references_cover_unions_and_intersections() {
        let options = TimeMapOptions::default()
            .with_union(Union::new("u", ["a", "b"]))
            .with_intersection(Intersection::new("i", ["b", "c"]));

        let refs: Vec<_> = options.references().collect();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].0, "u");
        assert_eq!(refs[1].1, ["b".to_string(), "c".to_string()]);
    }
}
