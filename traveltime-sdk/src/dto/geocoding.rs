//! Geocoding query parameters.
//!
//! Both geocoding endpoints are `GET` requests answered with a GeoJSON
//! `FeatureCollection`; only their query strings need building.

use super::Rectangle;

/// Parameters for `GET /geocoding/search`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodingQuery {
    pub query: String,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// ISO 3166-1 alpha-2/alpha-3 codes restricting the search.
    pub within_countries: Vec<String>,
    /// Return well-formatted names rather than raw address strings.
    pub format_name: Option<bool>,
    /// Leave the country out of formatted names.
    pub format_exclude_country: Option<bool>,
    pub bounds: Option<Rectangle>,
}

impl GeocodingQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn within_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.within_countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_format_name(mut self, format_name: bool) -> Self {
        self.format_name = Some(format_name);
        self
    }

    pub fn with_format_exclude_country(mut self, exclude: bool) -> Self {
        self.format_exclude_country = Some(exclude);
        self
    }

    pub fn with_bounds(mut self, bounds: Rectangle) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Query string pairs; unset parameters are omitted.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let pairs = [
            ("query", Some(self.query.clone())),
            ("limit", self.limit.map(|l| l.to_string())),
            ("within.country", combine_countries(&self.within_countries)),
            ("format.name", self.format_name.map(|b| b.to_string())),
            (
                "format.exclude.country",
                self.format_exclude_country.map(|b| b.to_string()),
            ),
            ("bounds", self.bounds.map(|b| b.to_bounds())),
        ];
        collect_pairs(pairs)
    }
}

/// Parameters for `GET /geocoding/reverse`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReverseGeocodingQuery {
    pub lat: f64,
    pub lng: f64,
    pub within_countries: Vec<String>,
}

impl ReverseGeocodingQuery {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            within_countries: Vec::new(),
        }
    }

    pub fn within_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.within_countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let pairs = [
            ("lat", Some(self.lat.to_string())),
            ("lng", Some(self.lng.to_string())),
            ("within.country", combine_countries(&self.within_countries)),
        ];
        collect_pairs(pairs)
    }
}

fn combine_countries(countries: &[String]) -> Option<String> {
    if countries.is_empty() {
        None
    } else {
        Some(countries.join(","))
    }
}

fn collect_pairs<const N: usize>(pairs: [(&str, Option<String>); N]) -> Vec<(String, String)> {
    pairs
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect()
}
