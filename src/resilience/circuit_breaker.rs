//! Circuit breaker for the primary dependency.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//! - Half-Open: a single trial call tests whether it recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures >= failure_threshold
//! Open → Half-Open: reset_timeout elapsed since the trip (on the next call)
//! Half-Open → Closed: trial call succeeds
//! Half-Open → Open: trial call fails (timeout restarts)
//! ```
//!
//! # Design Decisions
//! - State, counter, trip time and trial flag live behind one mutex
//! - The lock is never held across an await point
//! - Single trial in Half-Open; concurrent callers are rejected as if Open
//! - An abandoned trial counts as a failure so the breaker cannot wedge

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;

use crate::config::CircuitBreakerConfig;

/// Observable breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

/// Error returned by [`CircuitBreaker::call`].
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// The breaker rejected the call without running it.
    #[error("circuit breaker '{component}' is open")]
    Open { component: String },

    /// The call ran and failed.
    #[error("{0}")]
    Operation(E),
}

#[derive(Debug)]
struct BreakerInner {
    state: BreakerState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

/// Consecutive-failure circuit breaker, shared by all in-flight requests.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    failure_threshold: u32,
    reset_timeout: Duration,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, failure_threshold: u32, reset_timeout: Duration) -> Self {
        let name = name.into();
        tracing::info!(
            component = "circuit_breaker",
            breaker = %name,
            failure_threshold,
            reset_timeout_secs = reset_timeout.as_secs(),
            "Circuit breaker initialized"
        );

        Self {
            name,
            failure_threshold: failure_threshold.max(1),
            reset_timeout,
            inner: Mutex::new(BreakerInner {
                state: BreakerState::Closed,
                consecutive_failures: 0,
                opened_at: None,
                trial_in_flight: false,
            }),
        }
    }

    pub fn from_config(name: impl Into<String>, config: &CircuitBreakerConfig) -> Self {
        Self::new(
            name,
            config.failure_threshold,
            Duration::from_secs(config.reset_timeout_secs),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state. An expired Open breaker still reports Open until a call arrives.
    pub fn state(&self) -> BreakerState {
        self.lock().state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }

    /// Run `operation` through the breaker.
    ///
    /// Any `Err` from the operation counts as a failure; callers classify
    /// server-error responses as `Err` before they reach the breaker.
    pub async fn call<F, Fut, T, E>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let permit = self.try_acquire().ok_or_else(|| BreakerError::Open {
            component: self.name.clone(),
        })?;

        let result = operation().await;
        match &result {
            Ok(_) => permit.succeed(),
            Err(_) => permit.fail(),
        }

        result.map_err(BreakerError::Operation)
    }

    /// Admission check. Returns `None` when the call must be rejected.
    fn try_acquire(&self) -> Option<Permit<'_>> {
        let mut inner = self.lock();
        match inner.state {
            BreakerState::Closed => Some(Permit::new(self, false)),
            BreakerState::Open => {
                let expired = inner
                    .opened_at
                    .map_or(true, |opened| opened.elapsed() >= self.reset_timeout);
                if !expired {
                    tracing::debug!(breaker = %self.name, "Rejecting call, breaker open");
                    return None;
                }
                inner.state = BreakerState::HalfOpen;
                inner.trial_in_flight = true;
                tracing::info!(
                    component = "circuit_breaker",
                    breaker = %self.name,
                    "Reset timeout elapsed, admitting half-open trial"
                );
                Some(Permit::new(self, true))
            }
            BreakerState::HalfOpen => {
                if inner.trial_in_flight {
                    tracing::debug!(breaker = %self.name, "Rejecting call, half-open trial in flight");
                    return None;
                }
                inner.trial_in_flight = true;
                Some(Permit::new(self, true))
            }
        }
    }

    fn record_success(&self, trial: bool) {
        let mut inner = self.lock();
        if trial {
            inner.state = BreakerState::Closed;
            inner.consecutive_failures = 0;
            inner.opened_at = None;
            inner.trial_in_flight = false;
            tracing::info!(
                component = "circuit_breaker",
                breaker = %self.name,
                "Circuit breaker closed (recovered)"
            );
        } else if inner.state == BreakerState::Closed {
            inner.consecutive_failures = 0;
        }
    }

    fn record_failure(&self, trial: bool) {
        let mut inner = self.lock();
        if trial {
            inner.trial_in_flight = false;
            self.trip(&mut inner);
            return;
        }

        // Late results from calls admitted before a trip do not move the state.
        if inner.state != BreakerState::Closed {
            return;
        }

        inner.consecutive_failures += 1;
        if inner.consecutive_failures >= self.failure_threshold {
            self.trip(&mut inner);
        }
    }

    fn trip(&self, inner: &mut BreakerInner) {
        inner.state = BreakerState::Open;
        inner.opened_at = Some(Instant::now());
        tracing::warn!(
            component = "circuit_breaker",
            breaker = %self.name,
            consecutive_failures = inner.consecutive_failures,
            reset_timeout_secs = self.reset_timeout.as_secs(),
            "Circuit breaker opened"
        );
    }

    fn lock(&self) -> MutexGuard<'_, BreakerInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Admission ticket for one call. Settles exactly once.
struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    settled: bool,
}

impl<'a> Permit<'a> {
    fn new(breaker: &'a CircuitBreaker, trial: bool) -> Self {
        Self {
            breaker,
            trial,
            settled: false,
        }
    }

    fn succeed(mut self) {
        self.settled = true;
        self.breaker.record_success(self.trial);
    }

    fn fail(mut self) {
        self.settled = true;
        self.breaker.record_failure(self.trial);
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.settled && self.trial {
            tracing::warn!(breaker = %self.breaker.name, "Half-open trial abandoned");
            self.breaker.record_failure(true);
        }
    }
}
