//! Gateway error taxonomy.

use thiserror::Error;

use crate::downstream::DownstreamError;
use crate::resilience::BreakerError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// Primary presumed unhealthy; always routed to the fallback.
    #[error("circuit breaker '{component}' is open")]
    BreakerOpen { component: String },

    /// Transport failure or timeout calling the primary.
    #[error("{0}")]
    PrimaryTransport(String),

    /// Primary answered with a server error status.
    #[error("Service B returned {status}")]
    PrimaryServer { status: u16 },

    /// Storing a primary response failed. Recovered locally.
    #[error("Error storing response in cache: {0}")]
    CacheWrite(String),

    /// Secondary failed too; the fallback is exhausted.
    #[error("Service C also failed: {0}")]
    SecondaryTransport(String),

    /// The liveness probe lost the cache store. Fatal.
    #[error("Cache connectivity lost: {0}")]
    CacheConnectivityLost(String),

    #[error("Unexpected failure: {0}")]
    UnexpectedInternal(String),
}

impl GatewayError {
    /// Whether this failure of the primary path hands control to the fallback router.
    pub fn routes_to_fallback(&self) -> bool {
        matches!(
            self,
            Self::BreakerOpen { .. } | Self::PrimaryTransport(_) | Self::PrimaryServer { .. }
        )
    }
}

impl From<BreakerError<DownstreamError>> for GatewayError {
    fn from(error: BreakerError<DownstreamError>) -> Self {
        match error {
            BreakerError::Open { component } => Self::BreakerOpen { component },
            BreakerError::Operation(DownstreamError::ServerError { status, .. }) => {
                Self::PrimaryServer { status }
            }
            BreakerError::Operation(other) => Self::PrimaryTransport(other.to_string()),
        }
    }
}
