//! Cache store subsystem.
//!
//! # Data Flow
//! ```text
//! cache-aside reader / liveness monitor
//!     → store.rs (CacheStore: GET, SETEX, PING)
//!     → provider.rs (configured backend)
//!         → redis.rs (network store, per-command timeout)
//!         → memory.rs (in-process store for local runs and tests)
//! ```
//!
//! # Design Decisions
//! - The store, not the caller, enforces expiry
//! - Values are opaque strings, replayed verbatim
//! - Static dispatch through an enum; no boxed futures

pub mod memory;
pub mod provider;
pub mod redis;
pub mod store;

pub use memory::MemoryCacheStore;
pub use provider::CacheProvider;
pub use self::redis::RedisCacheStore;
pub use store::{CacheError, CacheResult, CacheStore};
