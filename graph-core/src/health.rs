use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde::Serialize;

/// Liveness/readiness status of a single dependency.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status")]
pub enum HealthStatus {
    Up,
    Down { reason: String },
}

/// A single named dependency check (e.g. "durable-store", "cache").
pub trait HealthIndicator: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self) -> Pin<Box<dyn Future<Output = HealthStatus> + Send + '_>>;

    /// Whether this indicator's failure should fail readiness (vs. liveness only).
    fn affects_readiness(&self) -> bool {
        true
    }
}

#[derive(Serialize)]
struct HealthCheckReport {
    name: &'static str,
    status: HealthStatus,
}

#[derive(Serialize)]
struct HealthResponse {
    healthy: bool,
    checks: Vec<HealthCheckReport>,
}

pub struct HealthState {
    indicators: Vec<Arc<dyn HealthIndicator>>,
}

impl HealthState {
    pub fn new(indicators: Vec<Arc<dyn HealthIndicator>>) -> Self {
        Self { indicators }
    }

    async fn aggregate(&self, readiness_only: bool) -> HealthResponse {
        let mut checks = Vec::with_capacity(self.indicators.len());
        let mut healthy = true;
        for indicator in &self.indicators {
            if readiness_only && !indicator.affects_readiness() {
                continue;
            }
            let status = indicator.check().await;
            if status != HealthStatus::Up {
                healthy = false;
            }
            checks.push(HealthCheckReport {
                name: indicator.name(),
                status,
            });
        }
        HealthResponse { healthy, checks }
    }
}

async fn live() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "live" })))
}

async fn health(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let report = state.aggregate(false).await;
    let status = if report.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

async fn ready(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let report = state.aggregate(true).await;
    let status = if report.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

/// Builds the unauthenticated `/health`, `/health/live`, `/health/ready` routes.
pub fn health_routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/live", get(live))
        .route("/health/ready", get(ready))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysUp;
    impl HealthIndicator for AlwaysUp {
        fn name(&self) -> &'static str {
            "always-up"
        }
        fn check(&self) -> Pin<Box<dyn Future<Output = HealthStatus> + Send + '_>> {
            Box::pin(async { HealthStatus::Up })
        }
    }

    struct AlwaysDown;
    impl HealthIndicator for AlwaysDown {
        fn name(&self) -> &'static str {
            "always-down"
        }
        fn check(&self) -> Pin<Box<dyn Future<Output = HealthStatus> + Send + '_>> {
            Box::pin(async {
                HealthStatus::Down {
                    reason: "boom".into(),
                }
            })
        }
        fn affects_readiness(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn aggregate_reports_healthy_when_all_up() {
        let state = HealthState::new(vec![Arc::new(AlwaysUp)]);
        let report = state.aggregate(false).await;
        assert!(report.healthy);
    }

    #[tokio::test]
    async fn aggregate_reports_unhealthy_on_failure() {
        let state = HealthState::new(vec![Arc::new(AlwaysUp), Arc::new(AlwaysDown)]);
        let report = state.aggregate(false).await;
        assert!(!report.healthy);
        assert_eq!(report.checks.len(), 2);
    }

    #[tokio::test]
    async fn readiness_skips_non_readiness_indicators() {
        let state = HealthState::new(vec![Arc::new(AlwaysDown)]);
        let report = state.aggregate(true).await;
        assert!(report.healthy);
        assert!(report.checks.is_empty());
    }
}
