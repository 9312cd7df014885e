//! Folding per-bundle responses back into one response.
//!
//! Merging is plain concatenation in bundle order. Because the splitter keeps
//! searches in order, the merged results are in original search order. Nothing
//! is deduplicated or re-keyed: each result carries the search id it
//! belongs to.

use geojson::FeatureCollection;

use crate::dto::postcodes::PostcodesResponse;
use crate::dto::routes::RoutesResponse;
use crate::dto::time_filter::TimeFilterResponse;
use crate::dto::time_map::TimeMapResponse;

/// A response type that can be rebuilt from the responses of its bundles.
pub trait Merge: Sized {
    /// Combine `parts`, given in bundle order, into one response.
    fn merge(parts: Vec<Self>) -> Self;
}

impl Merge for FeatureCollection {
    /// Features are concatenated; bounding boxes and foreign members of the
    /// parts are dropped since they describe a single bundle.
    fn merge(parts: Vec<Self>) -> Self {
        FeatureCollection {
            bbox: None,
            features: parts.into_iter().flat_map(|part| part.features).collect(),
            foreign_members: None,
        }
    }
}

impl Merge for TimeMapResponse {
    fn merge(parts: Vec<Self>) -> Self {
        TimeMapResponse {
            results: concat(parts.into_iter().map(|p| p.results)),
        }
    }
}

impl Merge for TimeFilterResponse {
    fn merge(parts: Vec<Self>) -> Self {
        TimeFilterResponse {
            results: concat(parts.into_iter().map(|p| p.results)),
        }
    }
}

impl Merge for PostcodesResponse {
    fn merge(parts: Vec<Self>) -> Self {
        PostcodesResponse {
            results: concat(parts.into_iter().map(|p| p.results)),
        }
    }
}

impl Merge for RoutesResponse {
    fn merge(parts: Vec<Self>) -> Self {
        RoutesResponse {
            results: concat(parts.into_iter().map(|p| p.results)),
        }
    }
}

fn concat<T>(lists: impl Iterator<Item = Vec<T>>) -> Vec<T> {
    lists.flatten().collect()
}
