//! The HTTP boundary.
//!
//! Everything above this module works with [`ApiRequest`] values and the
//! [`Transport`] trait; only [`HttpTransport`] knows about reqwest. Tests and
//! embedders can substitute [`MockTransport`] or their own implementation.

mod http;
mod mock;

use std::future::Future;
use std::sync::Arc;

use crate::auth::AcceptType;
use crate::error::TransportError;

pub use http::HttpTransport;
pub use mock::MockTransport;

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A transport-ready request: endpoint path relative to the base URL,
/// accept type, query parameters and an optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub accept: AcceptType,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// A `GET` request without query parameters.
    pub fn get(path: impl Into<String>, accept: AcceptType) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            accept,
            query: Vec::new(),
            body: None,
        }
    }

    /// A `POST` request with a JSON body.
    pub fn post(path: impl Into<String>, accept: AcceptType, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            accept,
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Replace the query parameters.
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// A successful response: status and undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// A `200 OK` response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Sends one request and returns its raw response.
///
/// Implementations map non-success statuses to [`TransportError::Api`] and own
/// connection handling and timeouts. They must not retry on behalf of the
/// caller: each call is exactly one outbound request.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
        (**self).send(request)
    }
}
