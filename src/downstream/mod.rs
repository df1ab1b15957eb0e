//! Downstream dependency subsystem.
//!
//! # Data Flow
//! ```text
//! cache-aside reader → breaker → client.rs (primary, status >= 500 is a failure)
//! fallback router    →           client.rs (secondary, any response is a success)
//! ```
//!
//! # Design Decisions
//! - One pooled hyper client per dependency
//! - Deadline covers connect, headers and body
//! - Bodies are opaque text; no schema is applied

pub mod client;

pub use client::{DownstreamClient, DownstreamError, DownstreamResponse};
