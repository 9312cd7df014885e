//! Map-info DTOs (`GET /map-info`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maps (countries/regions) the service covers and what each supports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapInfoResponse {
    pub maps: Vec<MapInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapInfo {
    pub name: String,
    pub features: MapFeatures,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapFeatures {
    /// Dates for which public transport timetables are loaded.
    pub public_transport: Option<PublicTransportDates>,
    pub fares: bool,
    pub postcodes: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicTransportDates {
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
}

impl MapInfoResponse {
    /// Look up a map by name.
    pub fn get(&self, name: &str) -> Option<&MapInfo> {
        self.maps.iter().find(|m| m.name == name)
    }
}
