//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the gateway and health handlers
//! - Wire up middleware (tracing, request deadline, request ID)
//! - Detach each orchestration from the client connection
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::cache::CacheProvider;
use crate::config::GatewayConfig;
use crate::gateway::{GatewayError, Outcome, RequestOrchestrator};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::HealthBody;

pub const GATEWAY_PATH: &str = "/api/v1/consul";
pub const HEALTH_PATH: &str = "/health";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<RequestOrchestrator<CacheProvider>>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    pub fn new(config: GatewayConfig, gateway: Arc<RequestOrchestrator<CacheProvider>>) -> Self {
        let router = Self::build_router(&config, AppState { gateway });
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route(GATEWAY_PATH, get(gateway_handler))
            .route(HEALTH_PATH, get(health_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request),
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.listener.request_timeout_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// The gateway endpoint.
///
/// Orchestration runs in its own task: a client that disconnects does not
/// cancel in-flight downstream calls, and a panic surfaces as a 500.
async fn gateway_handler(State(state): State<AppState>) -> Result<Outcome, GatewayError> {
    let gateway = Arc::clone(&state.gateway);
    tokio::spawn(async move { gateway.handle().await })
        .await
        .map_err(|e| GatewayError::UnexpectedInternal(format!("request task failed: {}", e)))?
}

async fn health_handler() -> Json<HealthBody> {
    tracing::info!(
        component = "service-a",
        status_code = 200,
        "Health check endpoint called."
    );
    Json(HealthBody {
        status: "ok",
        service: "A",
    })
}
