//! Result of one orchestrated request.

/// Produced fresh per request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    CacheHit(String),
    PrimarySuccess(String),
    FallbackSuccess(String),
    TotalFailure(String),
}

impl Outcome {
    /// Caller-facing message for the success paths.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::CacheHit(value) => Some(format!("Cached response from B: {}", value)),
            Self::PrimarySuccess(value) => Some(format!("Response from B: {}", value)),
            Self::FallbackSuccess(value) => Some(format!("B failed, response from C: {}", value)),
            Self::TotalFailure(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::TotalFailure(_))
    }

    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CacheHit(_) => "cache_hit",
            Self::PrimarySuccess(_) => "primary",
            Self::FallbackSuccess(_) => "fallback",
            Self::TotalFailure(_) => "total_failure",
        }
    }
}
