//! Startup orchestration.
//!
//! Order: metrics exporter → cache store connect → liveness monitor →
//! gateway engine → listener bind → serve until a signal arrives.
//! Any startup error is fatal.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::cache::{CacheError, CacheProvider};
use crate::config::GatewayConfig;
use crate::downstream::DownstreamError;
use crate::gateway::RequestOrchestrator;
use crate::health::{spawn_liveness_monitor, LivenessMonitor};
use crate::http::HttpServer;
use crate::lifecycle::signals::wait_for_signal;
use crate::lifecycle::Shutdown;
use crate::observability::{metrics, GatewayMetrics};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cache store unavailable: {0}")]
    Cache(#[from] CacheError),

    #[error("invalid downstream: {0}")]
    Downstream(#[from] DownstreamError),

    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Bring the gateway up and serve until SIGINT/SIGTERM.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = Arc::new(CacheProvider::from_config(&config.cache).await?);
    let shutdown = Shutdown::new();

    let monitor = LivenessMonitor::new(
        Arc::clone(&store),
        Duration::from_secs(config.cache.liveness_interval_secs),
    );
    let monitor_task = spawn_liveness_monitor(monitor, shutdown.subscribe());

    let gateway = Arc::new(RequestOrchestrator::new(&config, store, GatewayMetrics::new())?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        primary = %config.primary.url,
        secondary = %config.secondary.url,
        cache_provider = ?config.cache.provider,
        "Listening for connections"
    );

    let server = HttpServer::new(config, gateway);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    wait_for_signal().await;
    shutdown.trigger();

    server_task.await??;
    let _ = monitor_task.await;
    Ok(())
}
