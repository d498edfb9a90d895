//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the `/status` and `/data` handlers
//! - Wire up middleware (request ID, tracing, request timeout)
//! - Serve on a listener until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ListenerConfig;
use crate::http::request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::registry::StatusSnapshot;
use crate::routing::Router as DataRouter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<DataRouter>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    app: Router,
}

impl HttpServer {
    /// Create a new HTTP server around `router`.
    pub fn new(router: Arc<DataRouter>, config: &ListenerConfig) -> Self {
        let app = Self::build_router(
            AppState { router },
            Duration::from_secs(config.request_timeout_secs),
        );
        Self { app }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TimeoutLayer::new(request_timeout));

        Router::new()
            .route("/status", get(status_handler))
            .route("/data", get(data_handler))
            .with_state(state)
            .layer(middleware)
    }

    /// The Axum router, for in-process use.
    pub fn into_router(self) -> Router {
        self.app
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        stop: watch::Receiver<bool>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                shutdown::stopped(stop).await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `GET /status`: health of every configured backend.
async fn status_handler(State(state): State<AppState>) -> Json<StatusSnapshot> {
    let start = Instant::now();
    let snapshot = state.router.get_status();
    metrics::record_request("/status", 200, start);
    Json(snapshot)
}

/// `GET /data`: routed to one available backend.
async fn data_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start = Instant::now();

    let response = match state.router.get_data().await {
        Ok(upstream) => {
            tracing::debug!(request_id = %request_id(&headers), url = %upstream.url, "Data request served");
            response::forward(upstream)
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id(&headers), error = %e, "Data request failed");
            e.into_response()
        }
    };

    metrics::record_request("/data", response.status().as_u16(), start);
    response
}
