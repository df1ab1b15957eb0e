//! Health subsystem.
//!
//! # Data Flow
//! ```text
//! Liveness (liveness.rs):
//!     Periodic timer
//!     → PING the cache store
//!     → failure: log critical, exit the process
//! ```
//!
//! The inbound `/health` endpoint lives in `http::server` and never touches
//! the cache or the breaker.

pub mod liveness;

pub use liveness::{
    spawn_liveness_monitor, spawn_liveness_monitor_with_exit, LivenessMonitor, MonitorExit,
    EXIT_CACHE_LOST,
};
