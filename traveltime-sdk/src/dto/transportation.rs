//! Transport modes.
//!
//! The API accepts a fixed set of modes, each with its own optional tuning
//! fields. They serialize as `{"type": "<mode>", ...fields}`.

use serde::{Deserialize, Serialize};

/// Public transport (bus, rail, tram, ...) with walking to and from stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicTransport {
    /// Seconds allowed for each change between services.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pt_change_delay: Option<u32>,
    /// Maximum seconds of walking, in total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walking_time: Option<u32>,
    /// Maximum number of changes between services.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_changes: Option<MaxChanges>,
}

/// Limit on public transport changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxChanges {
    pub enabled: bool,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Driving {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_border_crossing: Option<bool>,
}

/// Ferry travel, optionally with a vehicle on board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ferry {
    /// Seconds spent boarding each ferry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boarding_time: Option<u32>,
}

/// Drive to a station, then continue by train.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrivingTrain {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pt_change_delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driving_time_to_station: Option<u32>,
    /// Seconds needed to park at the station.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walking_time: Option<u32>,
}

/// Cycle to a stop, then continue by public transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CyclingPublicTransport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walking_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pt_change_delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycling_time_to_station: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boarding_time: Option<u32>,
}

/// The transport mode of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Transportation {
    #[serde(rename = "public_transport")]
    PublicTransport(PublicTransport),
    #[serde(rename = "driving")]
    Driving(Driving),
    #[serde(rename = "walking")]
    Walking,
    #[serde(rename = "cycling")]
    Cycling,
    #[serde(rename = "ferry")]
    Ferry(Ferry),
    #[serde(rename = "driving+train")]
    DrivingTrain(DrivingTrain),
    #[serde(rename = "cycling+public_transport")]
    CyclingPublicTransport(CyclingPublicTransport),
}

impl Transportation {
    /// Public transport with default settings.
    pub fn public_transport() -> Self {
        Transportation::PublicTransport(PublicTransport::default())
    }

    /// Driving with default settings.
    pub fn driving() -> Self {
        Transportation::Driving(Driving::default())
    }

    /// The mode's wire name.
    pub fn mode(&self) -> &'static str {
        match self {
            Transportation::PublicTransport(_) => "public_transport",
            Transportation::Driving(_) => "driving",
            Transportation::Walking => "walking",
            Transportation::Cycling => "cycling",
            Transportation::Ferry(_) => "ferry",
            Transportation::DrivingTrain(_) => "driving+train",
            Transportation::CyclingPublicTransport(_) => "cycling+public_transport",
        }
    }
}
