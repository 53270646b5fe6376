//! HTTP server setup and request handlers.
//!
//! # Responsibilities
//! - Create the Axum router with the relay endpoints
//! - Wire up middleware (tracing, body limit, request ID)
//! - Serve with graceful shutdown
//! - Map relay outcomes onto HTTP responses and metrics

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::observability::metrics;
use crate::relay::{Relay, RequestSpec, ResponseSpec, SendError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration. Builds the
    /// relay engine and both outbound transports up front.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let relay = Arc::new(Relay::new(&config)?);
        let state = AppState { relay };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/send", post(send_handler))
            .route("/api/ping", get(ping_handler))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(
                config.limits.max_request_body_bytes,
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// POST /api/send: execute one request spec and describe the outcome.
///
/// Upstream HTTP errors are not relay errors: a 4xx/5xx from the target
/// still comes back as a 200 with the status captured in the body.
async fn send_handler(
    State(state): State<AppState>,
    Json(spec): Json<RequestSpec>,
) -> Result<Json<ResponseSpec>, SendError> {
    let started = Instant::now();
    if let Err(error) = validate_spec(&spec) {
        metrics::record_send(&spec.method, error.kind(), started);
        return Err(error);
    }

    tracing::debug!(method = %spec.method, url = %spec.url, "Relaying request");
    let result = state.relay.send(&spec).await;

    let outcome = match &result {
        Ok(response) => {
            tracing::debug!(
                status = response.status,
                duration_ms = response.duration_ms,
                size_bytes = response.size_bytes,
                "Relay complete"
            );
            response.status.to_string()
        }
        Err(error) => {
            tracing::warn!(
                method = %spec.method,
                url = %spec.url,
                error = %error,
                "Relay failed"
            );
            error.kind().to_string()
        }
    };
    metrics::record_send(&spec.method, &outcome, started);

    result.map(Json)
}

/// GET /api/ping: liveness probe.
async fn ping_handler() -> &'static str {
    "pong"
}

/// url and method must be non-blank. Checked before translation so the
/// caller gets a message naming the field.
fn validate_spec(spec: &RequestSpec) -> Result<(), SendError> {
    if spec.url.trim().is_empty() {
        return Err(SendError::InvalidRequest(
            "url must not be blank".to_string(),
        ));
    }
    if spec.method.trim().is_empty() {
        return Err(SendError::InvalidRequest(
            "method must not be blank".to_string(),
        ));
    }
    Ok(())
}
