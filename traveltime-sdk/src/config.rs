//! Client configuration.

use std::fmt;

use crate::batch::DispatchMode;
use crate::error::TravelTimeError;

/// Default base URL for the TravelTime API.
pub const DEFAULT_BASE_URL: &str = "https://api.traveltimeapp.com/v4";

/// Default maximum number of in-flight HTTP requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default number of search items per outbound request.
const DEFAULT_WINDOW_SIZE: usize = 10;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the TravelTime clients.
///
/// Everything is supplied by the caller and passed through unchanged; the
/// library never reads the environment.
#[derive(Clone)]
pub struct ClientConfig {
    /// Application id sent as `X-Application-Id`
    pub app_id: String,
    /// API key sent as `X-Api-Key`
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent HTTP requests
    pub max_concurrent: usize,
    /// Maximum number of search items sent in one request
    pub window_size: usize,
    /// How bundles are dispatched. `None` lets each client pick its default:
    /// concurrent for the async client, sequential for the blocking one.
    pub dispatch_mode: Option<DispatchMode>,
}

impl ClientConfig {
    /// Create a new config with the given credentials.
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            window_size: DEFAULT_WINDOW_SIZE,
            dispatch_mode: None,
        }
    }

    /// Point the client at another deployment, such as a local mock server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Per-request timeout in seconds, covering connect through body read.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Cap on HTTP requests in flight at once, across all bundles.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set the maximum number of search items per request.
    pub fn with_window_size(mut self, n: usize) -> Self {
        self.window_size = n;
        self
    }

    /// Force a dispatch mode.
    pub fn with_dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.dispatch_mode = Some(mode);
        self
    }

    /// Check the values that can be checked without contacting the service.
    pub fn validate(&self) -> Result<(), TravelTimeError> {
        if self.window_size == 0 {
            return Err(TravelTimeError::config("window size must be at least 1"));
        }
        if self.max_concurrent == 0 {
            return Err(TravelTimeError::config("max concurrent requests must be at least 1"));
        }
        reqwest::Url::parse(&self.base_url).map_err(|e| {
            TravelTimeError::config(format!("invalid base URL {:?}: {e}", self.base_url))
        })?;
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("app_id", &self.app_id)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_concurrent", &self.max_concurrent)
            .field("window_size", &self.window_size)
            .field("dispatch_mode", &self.dispatch_mode)
            .finish()
    }
}
