//! Client error types.
//!
//! [`TransportError`] describes a single failed HTTP exchange. [`TravelTimeError`]
//! is what every public operation returns: it wraps transport failures with the
//! index of the bundle that failed, and adds the configuration and decoding
//! failures detected around the transport.

use std::collections::HashMap;

use serde::Deserialize;

/// Maximum number of body characters kept in error messages.
const BODY_EXCERPT_CHARS: usize = 500;

/// Structured error body returned by the API on non-success responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorPayload {
    /// HTTP status echoed by the service.
    pub http_status: u16,

    /// Service-specific error code.
    pub error_code: u32,

    /// Human-readable description.
    pub description: String,

    /// Link to the error's documentation page.
    pub documentation_link: String,

    /// Per-field details, e.g. which search ids were rejected.
    #[serde(default)]
    pub additional_info: HashMap<String, Vec<String>>,
}

/// Errors from a single request sent through a [`Transport`](crate::transport::Transport).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, TLS, body read, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// API returned a non-success status code
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        payload: Option<ApiErrorPayload>,
    },

    /// The transport cannot accept requests
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

impl TransportError {
    /// Build an [`TransportError::Api`] from a status code and raw body.
    ///
    /// The body is parsed as an [`ApiErrorPayload`] when possible; the
    /// payload's description becomes the message, otherwise an excerpt of
    /// the raw body is used.
    pub fn api(status: u16, body: &str) -> Self {
        let payload = serde_json::from_str::<ApiErrorPayload>(body).ok();
        let message = match &payload {
            Some(p) => p.description.clone(),
            None => excerpt(body),
        };
        TransportError::Api {
            status,
            message,
            payload,
        }
    }

    /// HTTP status of the failed exchange, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Api { status, .. } => Some(*status),
            TransportError::Http(e) => e.status().map(|s| s.as_u16()),
            TransportError::Timeout | TransportError::Unavailable(_) => None,
        }
    }
}

/// Errors returned by the client operations.
#[derive(Debug, thiserror::Error)]
pub enum TravelTimeError {
    /// Rejected before anything was sent (window size, shared options,
    /// duplicate search ids, credentials, base URL)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The request for one bundle failed
    #[error("bundle {bundle} failed: {source}")]
    Transport {
        bundle: usize,
        #[source]
        source: TransportError,
    },

    /// A response body did not match the endpoint's response shape
    #[error("malformed response for bundle {bundle}: {message}")]
    MalformedResponse {
        bundle: usize,
        message: String,
        body: Option<String>,
    },

    /// The blocking client could not build or use a runtime
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

impl TravelTimeError {
    /// Shorthand for [`TravelTimeError::InvalidConfiguration`].
    pub(crate) fn config(message: impl Into<String>) -> Self {
        TravelTimeError::InvalidConfiguration(message.into())
    }

    /// Index of the bundle the error is attributed to, if any.
    pub fn bundle(&self) -> Option<usize> {
        match self {
            TravelTimeError::Transport { bundle, .. }
            | TravelTimeError::MalformedResponse { bundle, .. } => Some(*bundle),
            TravelTimeError::InvalidConfiguration(_) | TravelTimeError::Runtime(_) => None,
        }
    }
}

/// First [`BODY_EXCERPT_CHARS`] characters of a response body.
pub(crate) fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
