//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap downstream and cache calls with a deadline
//! - Report which operation ran out of time
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// An operation did not complete within its deadline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{operation} timed out after {limit:?}")]
pub struct TimedOut {
    pub operation: &'static str,
    pub limit: Duration,
}

/// Run `future` with a deadline of `limit`.
pub async fn with_timeout<F>(
    operation: &'static str,
    limit: Duration,
    future: F,
) -> Result<F::Output, TimedOut>
where
    F: Future,
{
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| TimedOut { operation, limit })
}
