//! Cache store liveness monitoring.
//!
//! # Responsibilities
//! - PING the cache store on a fixed interval
//! - Treat a failed or negative probe as fatal for the process
//!
//! # Design Decisions
//! - No retry, no backoff: the first failed probe terminates
//! - Termination is an explicit `process::exit`, not a signal to callers

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;

use crate::cache::CacheStore;
use crate::gateway::GatewayError;

/// Exit code used when cache connectivity is lost.
pub const EXIT_CACHE_LOST: i32 = 1;

/// Private health flag; other components never read it.
#[derive(Debug, Default)]
struct MonitorStatus {
    healthy: bool,
}

/// Why [`LivenessMonitor::run`] returned.
#[derive(Debug)]
pub enum MonitorExit {
    /// Probe failed; the process must terminate.
    Fatal(GatewayError),
    /// Shutdown was requested.
    Shutdown,
}

pub struct LivenessMonitor<S> {
    store: Arc<S>,
    interval: Duration,
    status: MonitorStatus,
}

impl<S> LivenessMonitor<S>
where
    S: CacheStore + 'static,
{
    pub fn new(store: Arc<S>, interval: Duration) -> Self {
        Self {
            store,
            interval,
            status: MonitorStatus::default(),
        }
    }

    /// One probe. `Err` means connectivity is lost.
    pub async fn probe(&mut self) -> Result<(), GatewayError> {
        match self.store.ping().await {
            Ok(true) => {
                tracing::info!(
                    component = "redis",
                    provider = self.store.provider_name(),
                    recovered = !self.status.healthy,
                    "Connection established successfully."
                );
                self.status.healthy = true;
                Ok(())
            }
            Ok(false) => {
                self.status.healthy = false;
                Err(GatewayError::CacheConnectivityLost(
                    "Unable to establish connection to cache store".into(),
                ))
            }
            Err(e) => {
                self.status.healthy = false;
                Err(GatewayError::CacheConnectivityLost(format!("Connection failed: {}", e)))
            }
        }
    }

    /// Probe every interval (first probe immediately) until a probe fails or shutdown.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> MonitorExit {
        tracing::info!(
            component = "redis",
            interval_secs = self.interval.as_secs(),
            "Liveness monitor starting"
        );

        let mut ticker = time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.probe().await {
                        return MonitorExit::Fatal(e);
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!(component = "redis", "Liveness monitor received shutdown signal, exiting loop");
                    return MonitorExit::Shutdown;
                }
            }
        }
    }
}

/// Spawn the monitor; a fatal probe terminates the whole process.
pub fn spawn_liveness_monitor<S>(
    monitor: LivenessMonitor<S>,
    shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()>
where
    S: CacheStore + 'static,
{
    spawn_liveness_monitor_with_exit(monitor, shutdown, |code| std::process::exit(code))
}

/// Spawn the monitor, handing the exit code to `exit` on a fatal probe.
pub fn spawn_liveness_monitor_with_exit<S, F>(
    monitor: LivenessMonitor<S>,
    shutdown: broadcast::Receiver<()>,
    exit: F,
) -> JoinHandle<()>
where
    S: CacheStore + 'static,
    F: FnOnce(i32) + Send + 'static,
{
    tokio::spawn(async move {
        if let MonitorExit::Fatal(error) = monitor.run(shutdown).await {
            tracing::error!(
                component = "redis",
                severity = "critical",
                "CRITICAL ERROR: {}",
                error
            );
            exit(EXIT_CACHE_LOST);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, CacheResult, MemoryCacheStore};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Answers PING from a script, then keeps answering `Ok(true)`.
    struct ScriptedStore {
        replies: Mutex<VecDeque<CacheResult<bool>>>,
        pings: AtomicU32,
    }

    impl ScriptedStore {
        fn new(replies: Vec<CacheResult<bool>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                pings: AtomicU32::new(0),
            }
        }
    }

    impl CacheStore for ScriptedStore {
        async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            Ok(None)
        }

        async fn set_with_ttl(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
            Ok(())
        }

        async fn ping(&self) -> CacheResult<bool> {
            self.pings.fetch_add(1, Ordering::SeqCst);
            self.replies.lock().unwrap().pop_front().unwrap_or(Ok(true))
        }

        fn provider_name(&self) -> &'static str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_probe_healthy_store() {
        let mut monitor = LivenessMonitor::new(Arc::new(MemoryCacheStore::new()), Duration::from_secs(10));
        assert!(monitor.probe().await.is_ok());
        assert!(monitor.status.healthy);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_every_healthy_probe_logs_at_info() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut monitor = LivenessMonitor::new(Arc::new(MemoryCacheStore::new()), Duration::from_secs(10));
        for _ in 0..3 {
            monitor.probe().await.unwrap();
        }

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("Connection established successfully.").count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_error_is_fatal_without_retry() {
        let store = Arc::new(ScriptedStore::new(vec![
            Ok(true),
            Ok(true),
            Err(CacheError::Connection("refused".into())),
        ]));
        let monitor = LivenessMonitor::new(Arc::clone(&store), Duration::from_secs(10));
        let (_tx, rx) = broadcast::channel(1);

        let exit = monitor.run(rx).await;

        assert!(matches!(exit, MonitorExit::Fatal(GatewayError::CacheConnectivityLost(_))));
        assert_eq!(store.pings.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_negative_reply_is_fatal() {
        let store = Arc::new(ScriptedStore::new(vec![Ok(false)]));
        let monitor = LivenessMonitor::new(Arc::clone(&store), Duration::from_secs(10));
        let (_tx, rx) = broadcast::channel(1);

        assert!(matches!(monitor.run(rx).await, MonitorExit::Fatal(_)));
        assert_eq!(store.pings.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lost_connectivity_exits_with_code() {
        let store = Arc::new(ScriptedStore::new(vec![
            Ok(true),
            Err(CacheError::Timeout("redis PING".into())),
        ]));
        let monitor = LivenessMonitor::new(store, Duration::from_secs(10));
        let (_tx, rx) = broadcast::channel(1);
        let (code_tx, code_rx) = tokio::sync::oneshot::channel();

        spawn_liveness_monitor_with_exit(monitor, rx, move |code| {
            let _ = code_tx.send(code);
        })
        .await
        .unwrap();

        assert_eq!(code_rx.await.unwrap(), EXIT_CACHE_LOST);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_does_not_exit() {
        let monitor = LivenessMonitor::new(Arc::new(ScriptedStore::new(vec![])), Duration::from_secs(10));
        let (tx, rx) = broadcast::channel(1);
        let exited = Arc::new(AtomicU32::new(0));

        let flag = Arc::clone(&exited);
        let handle = spawn_liveness_monitor_with_exit(monitor, rx, move |_| {
            flag.fetch_add(1, Ordering::SeqCst);
        });
        time::sleep(Duration::from_secs(15)).await;
        tx.send(()).unwrap();
        handle.await.unwrap();

        assert_eq!(exited.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probes_on_interval_until_shutdown() {
        let store = Arc::new(ScriptedStore::new(vec![]));
        let monitor = LivenessMonitor::new(Arc::clone(&store), Duration::from_secs(10));
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(monitor.run(rx));
        time::sleep(Duration::from_secs(25)).await;
        tx.send(()).unwrap();

        assert!(matches!(handle.await.unwrap(), MonitorExit::Shutdown));
        assert_eq!(store.pings.load(Ordering::SeqCst), 3);
    }
}
