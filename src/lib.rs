//! Resilient request gateway library.
//!
//! Fronts a primary dependency with a short-lived cache and a circuit
//! breaker, and degrades to a secondary dependency when the primary is
//! unhealthy.

pub mod cache;
pub mod config;
pub mod downstream;
pub mod gateway;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::GatewayConfig;
pub use gateway::{GatewayError, Outcome, RequestOrchestrator};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
