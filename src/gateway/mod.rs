//! Request orchestration engine.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → orchestrator.rs
//!         → cache_aside.rs (cache lookup, then breaker-guarded primary call)
//!         → on primary failure: fallback.rs (secondary call)
//!     → Outcome (cache hit / primary / fallback / total failure)
//! ```
//!
//! # Design Decisions
//! - Cache lookup always precedes the primary call
//! - Cache writes never delay the response
//! - Both-dependencies-down is an outcome, not an error; errors are unexpected only

pub mod cache_aside;
pub mod error;
pub mod fallback;
pub mod orchestrator;
pub mod outcome;

#[cfg(test)]
pub(crate) mod testing;

pub use cache_aside::CacheAsideReader;
pub use error::GatewayError;
pub use fallback::FallbackRouter;
pub use orchestrator::RequestOrchestrator;
pub use outcome::Outcome;
