//! Response construction for gateway clients.
//!
//! # Responsibilities
//! - Forward a backend's data response (status, content type, body)
//! - Map gateway errors to HTTP status codes with a JSON error body

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::GatewayError;
use crate::http::client::UpstreamResponse;

/// Names the backend URL that served a data response.
pub const X_SERVED_BY: HeaderName = HeaderName::from_static("x-served-by");

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match self {
            GatewayError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Pass a backend data response through unmodified.
pub fn forward(upstream: UpstreamResponse) -> Response {
    let mut response = (upstream.status, upstream.body).into_response();
    let headers = response.headers_mut();
    if let Some(content_type) = upstream.content_type {
        headers.insert(header::CONTENT_TYPE, content_type);
    }
    if let Ok(url) = HeaderValue::from_str(&upstream.url) {
        headers.insert(X_SERVED_BY, url);
    }
    response
}
