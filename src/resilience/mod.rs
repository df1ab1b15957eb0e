//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to the primary dependency:
//!     → circuit_breaker.rs (admit or reject, track consecutive failures)
//!     → timeouts.rs (enforce the per-call deadline)
//!     → outcome fed back into circuit_breaker.rs
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - The breaker guards the primary dependency only; fallback calls bypass it
//! - A single mutex scope owns all breaker state transitions

pub mod circuit_breaker;
pub mod timeouts;

pub use circuit_breaker::{BreakerError, BreakerState, CircuitBreaker};
pub use timeouts::{with_timeout, TimedOut};
