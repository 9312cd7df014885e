//! Authentication headers.

use std::fmt;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::error::TravelTimeError;

const APP_ID_HEADER: &str = "x-application-id";
const API_KEY_HEADER: &str = "x-api-key";

/// Response formats requested by the implemented endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AcceptType {
    #[default]
    Json,
    GeoJson,
}

impl AcceptType {
    /// MIME type sent in the `Accept` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            AcceptType::Json => "application/json",
            AcceptType::GeoJson => "application/geo+json",
        }
    }
}

impl fmt::Display for AcceptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application id and API key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    app_id: String,
    api_key: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Headers sent with every request: application id, API key, JSON
    /// content type and the requested accept type.
    pub fn headers(&self, accept: AcceptType) -> Result<HeaderMap, TravelTimeError> {
        let mut headers = HeaderMap::new();

        let app_id = HeaderValue::from_str(&self.app_id)
            .map_err(|_| TravelTimeError::config("invalid application id format"))?;
        let mut api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| TravelTimeError::config("invalid API key format"))?;
        api_key.set_sensitive(true);

        headers.insert(HeaderName::from_static(APP_ID_HEADER), app_id);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static(accept.as_str()));

        Ok(headers)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
