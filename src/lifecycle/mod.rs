//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Metrics → Cache connect → Liveness monitor → Engine → Listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → server drains, monitor stops → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! Losing the cache store is not a shutdown: the liveness monitor exits the
//! process directly.

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
