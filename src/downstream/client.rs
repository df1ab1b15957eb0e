//! HTTP client for a single downstream dependency.
//!
//! # Responsibilities
//! - GET the dependency's base URL under a deadline
//! - Buffer the body as opaque text
//! - Classify server errors (status >= 500) for breaker accounting

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode, Uri};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::config::DownstreamConfig;
use crate::resilience::with_timeout;

/// Upper bound on a buffered downstream body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DownstreamError {
    #[error("{service}: invalid URL '{url}': {reason}")]
    InvalidUrl {
        service: String,
        url: String,
        reason: String,
    },

    #[error("{service} request failed: {reason}")]
    Transport { service: String, reason: String },

    #[error("{service} timed out after {timeout:?}")]
    Timeout { service: String, timeout: Duration },

    #[error("{service} returned {status}")]
    ServerError { service: String, status: u16 },
}

/// A buffered downstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Clone)]
pub struct DownstreamClient {
    service: String,
    uri: Uri,
    timeout: Duration,
    client: Client<HttpConnector, Body>,
}

impl std::fmt::Debug for DownstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownstreamClient")
            .field("service", &self.service)
            .field("uri", &self.uri)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl DownstreamClient {
    pub fn new(service: impl Into<String>, config: &DownstreamConfig) -> Result<Self, DownstreamError> {
        let service = service.into();
        let uri: Uri = config.url.parse().map_err(|e: axum::http::uri::InvalidUri| {
            DownstreamError::InvalidUrl {
                service: service.clone(),
                url: config.url.clone(),
                reason: e.to_string(),
            }
        })?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            service,
            uri,
            timeout: Duration::from_millis(config.timeout_ms),
            client,
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// GET the base URL. Any HTTP response, whatever its status, is `Ok`.
    pub async fn fetch(&self) -> Result<DownstreamResponse, DownstreamError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(self.uri.clone())
            .header(header::USER_AGENT, "resilient-gateway")
            .body(Body::empty())
            .map_err(|e| self.transport(e))?;

        let exchange = async {
            let response = self.client.request(request).await.map_err(|e| self.transport(e))?;
            self.read_body(response).await
        };

        with_timeout("downstream request", self.timeout, exchange)
            .await
            .map_err(|_| DownstreamError::Timeout {
                service: self.service.clone(),
                timeout: self.timeout,
            })?
    }

    /// Like [`fetch`](Self::fetch), but a status >= 500 is an error.
    pub async fn fetch_classified(&self) -> Result<DownstreamResponse, DownstreamError> {
        let response = self.fetch().await?;
        if response.status.is_server_error() {
            return Err(DownstreamError::ServerError {
                service: self.service.clone(),
                status: response.status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn read_body(
        &self,
        response: axum::http::Response<Incoming>,
    ) -> Result<DownstreamResponse, DownstreamError> {
        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(Body::new(body), MAX_BODY_BYTES)
            .await
            .map_err(|e| self.transport(e))?;

        Ok(DownstreamResponse {
            status: parts.status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    fn transport(&self, error: impl std::fmt::Display) -> DownstreamError {
        DownstreamError::Transport {
            service: self.service.clone(),
            reason: error.to_string(),
        }
    }
}
