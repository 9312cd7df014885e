//! TravelTime API client.
//!
//! Typed operations for the map-info, time-map, time-filter, postcodes,
//! routes and geocoding endpoints. Requests holding more searches than fit
//! in one call are split into bundles, dispatched sequentially or
//! concurrently, and the responses merged back into one result in the
//! original search order.
//!
//! [`TravelTimeClient`] is async; [`blocking::TravelTimeClient`] wraps it for
//! synchronous callers.

pub mod auth;
pub mod batch;
pub mod blocking;
pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod transport;

pub use client::TravelTimeClient;
pub use config::ClientConfig;
pub use error::{TransportError, TravelTimeError};
