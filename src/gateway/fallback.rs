//! Fallback routing to the secondary dependency.
//!
//! Entered only after a primary-path failure. The secondary is called
//! directly, with no breaker and no cache in front of it.

use crate::downstream::DownstreamClient;
use crate::gateway::error::GatewayError;
use crate::gateway::outcome::Outcome;
use crate::observability::GatewayMetrics;

pub struct FallbackRouter {
    secondary: DownstreamClient,
    metrics: GatewayMetrics,
}

impl FallbackRouter {
    pub fn new(secondary: DownstreamClient, metrics: GatewayMetrics) -> Self {
        Self { secondary, metrics }
    }

    /// Route one failed request. Counts exactly one breaker activation whatever the cause.
    pub async fn route(&self, cause: &GatewayError) -> Outcome {
        tracing::warn!(
            component = "circuit_breaker",
            status_code = 503,
            "Activated: {}. Redirecting to Service C.",
            cause
        );
        self.metrics.record_breaker_activation();

        // Any response from the secondary is accepted as-is; only transport failures exhaust it.
        match self.secondary.fetch().await {
            Ok(response) => Outcome::FallbackSuccess(response.body),
            Err(e) => {
                let error = GatewayError::SecondaryTransport(e.to_string());
                tracing::error!(
                    component = "service",
                    status_code = 503,
                    "CRITICAL ERROR: {}",
                    error
                );
                Outcome::TotalFailure(error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DownstreamConfig;
    use crate::gateway::testing::{closed_port_url, MockDependency};

    fn router(url: String) -> FallbackRouter {
        let secondary = DownstreamClient::new("service-c", &DownstreamConfig::new(url)).unwrap();
        FallbackRouter::new(secondary, GatewayMetrics::new())
    }

    #[tokio::test]
    async fn test_secondary_success() {
        let secondary = MockDependency::fixed(200, "ok-C").await;
        let router = router(secondary.url());

        let outcome = router
            .route(&GatewayError::BreakerOpen {
                component: "service-b".into(),
            })
            .await;

        assert_eq!(outcome, Outcome::FallbackSuccess("ok-C".into()));
        assert_eq!(router.metrics.breaker_activations(), 1);
        assert_eq!(secondary.hits(), 1);
    }

    #[tokio::test]
    async fn test_secondary_transport_failure_is_total_failure() {
        let router = router(closed_port_url().await);

        let outcome = router.route(&GatewayError::PrimaryServer { status: 500 }).await;

        assert!(matches!(outcome, Outcome::TotalFailure(ref reason) if reason.contains("Service C also failed")));
        assert_eq!(router.metrics.breaker_activations(), 1);
    }

    #[tokio::test]
    async fn test_activation_counted_once_per_request() {
        let secondary = MockDependency::fixed(200, "ok-C").await;
        let router = router(secondary.url());

        router.route(&GatewayError::PrimaryTransport("refused".into())).await;
        router.route(&GatewayError::PrimaryServer { status: 503 }).await;

        assert_eq!(router.metrics.breaker_activations(), 2);
    }
}
