//! Downstream HTTP client.
//!
//! # Responsibilities
//! - Issue GET requests to storage services
//! - Bound every call (connect, send, read body) by one deadline
//! - Buffer the response so callers can inspect or forward it
//!
//! # Design Decisions
//! - Uses hyper-util's pooled legacy client (plain HTTP only)
//! - Timeouts are distinct from transport errors

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, Request, StatusCode};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;

/// Responses larger than this are treated as a failed read.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

const USER_AGENT: &str = concat!("storage-gateway/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    #[error("invalid request to {url}: {source}")]
    InvalidRequest {
        url: String,
        #[source]
        source: axum::http::Error,
    },

    #[error("reading body from {url} failed: {reason}")]
    Body { url: String, reason: String },
}

/// A fully buffered downstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// Absolute URL that produced this response.
    pub url: String,
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Cloneable GET client shared by the health monitor and the router.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url`, returning the buffered response whatever its status.
    pub async fn get(&self, url: &str) -> Result<UpstreamResponse, UpstreamError> {
        let request = Request::builder()
            .method("GET")
            .uri(url)
            .header(header::USER_AGENT, USER_AGENT)
            .body(Body::empty())
            .map_err(|source| UpstreamError::InvalidRequest {
                url: url.to_string(),
                source,
            })?;

        match time::timeout(self.timeout, self.send(url, request)).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }),
        }
    }

    async fn send(&self, url: &str, request: Request<Body>) -> Result<UpstreamResponse, UpstreamError> {
        let response: hyper::Response<Incoming> = self
            .client
            .request(request)
            .await
            .map_err(|source| UpstreamError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = axum::body::to_bytes(Body::new(response.into_body()), MAX_BODY_BYTES)
            .await
            .map_err(|e| UpstreamError::Body {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(UpstreamResponse {
            url: url.to_string(),
            status,
            content_type,
            body,
        })
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
