//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use resilient_gateway::cache::{CacheProvider, MemoryCacheStore};
use resilient_gateway::config::{DownstreamConfig, GatewayConfig};
use resilient_gateway::observability::GatewayMetrics;
use resilient_gateway::{HttpServer, RequestOrchestrator, Shutdown};

/// A mock dependency listening on an ephemeral port.
pub struct MockBackend {
    pub addr: SocketAddr,
    hits: Arc<AtomicU32>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start a mock backend that always returns `status` with `body`.
pub async fn start_mock_backend(status: u16, body: &'static str) -> MockBackend {
    start_programmable_backend(move |_| async move { (status, body.to_string()) }).await
}

/// Start a mock backend whose response is computed per request.
///
/// The closure receives the zero-based index of the request.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockBackend
where
    F: Fn(u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let f = Arc::new(f);

    let task_hits = Arc::clone(&hits);
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let n = task_hits.fetch_add(1, Ordering::SeqCst);
            let f = Arc::clone(&f);
            tokio::spawn(async move {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let (status, body) = f(n).await;
                let response = format!(
                    "HTTP/1.1 {} Mock\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockBackend { addr, hits }
}

/// URL of a local port with nothing listening.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

/// Gateway config pointing at the given dependencies, metrics exporter off.
pub fn test_config(primary: String, secondary: String) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.primary = DownstreamConfig::new(primary);
    config.secondary = DownstreamConfig::new(secondary);
    config.observability.metrics_enabled = false;
    config
}

/// A gateway served on an ephemeral port, backed by an in-memory cache.
pub struct TestGateway {
    pub base_url: String,
    pub store: MemoryCacheStore,
    pub gateway: Arc<RequestOrchestrator<CacheProvider>>,
    shutdown: Shutdown,
}

impl TestGateway {
    pub async fn start(config: GatewayConfig) -> Self {
        let store = MemoryCacheStore::new();
        let provider = Arc::new(CacheProvider::from(store.clone()));
        let gateway = Arc::new(
            RequestOrchestrator::new(&config, provider, GatewayMetrics::new()).unwrap(),
        );

        let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let server = HttpServer::new(config, Arc::clone(&gateway));
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            store,
            gateway,
            shutdown,
        }
    }

    pub fn consul_url(&self) -> String {
        format!("{}/api/v1/consul", self.base_url)
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        self.gateway.metrics()
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Poll `f` until it returns true or `timeout` elapses.
pub async fn eventually<F: Fn() -> bool>(timeout: Duration, f: F) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if f() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    f()
}
