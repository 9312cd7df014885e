//! reqwest-backed transport.
//!
//! Handles authentication headers, the request timeout, and a concurrency
//! limit on in-flight requests.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use tokio::sync::Semaphore;
use tracing::trace;

use crate::auth::{AcceptType, Credentials};
use crate::config::ClientConfig;
use crate::error::{TransportError, TravelTimeError};

use super::{ApiRequest, HttpMethod, RawResponse, Transport};

/// HTTP transport for the TravelTime API.
///
/// Uses a semaphore to limit concurrent requests; requests beyond
/// `max_concurrent` wait for a permit rather than failing.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl HttpTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, TravelTimeError> {
        config.validate()?;

        // Per-request Accept headers override this default.
        let headers =
            Credentials::new(&config.app_id, &config.api_key).headers(AcceptType::Json)?;

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TravelTimeError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stop accepting requests.
    ///
    /// Requests already holding a permit run to completion; later sends,
    /// on this transport or any clone of it, fail with
    /// [`TransportError::Unavailable`].
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TransportError::Unavailable("transport closed".to_string()))?;

        let url = self.url(&request.path);
        trace!(url = %url, method = ?request.method, "Sending request");

        let builder = match request.method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
        };
        let mut builder = builder
            .header(ACCEPT, request.accept.as_str())
            .query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(convert_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(convert_reqwest_error)?;

        if !status.is_success() {
            return Err(TransportError::api(status.as_u16(), &body));
        }

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn convert_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Http(err)
    }
}
