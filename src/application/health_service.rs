// Health service - Use case for the datasource connectivity check
use crate::application::point_data_retriever::LivenessChecker;
use crate::domain::health::{HealthCheckResult, HealthStatus};
use std::sync::Arc;

#[derive(Clone)]
pub struct HealthService {
    checker: Arc<dyn LivenessChecker>,
}

impl HealthService {
    pub fn new(checker: Arc<dyn LivenessChecker>) -> Self {
        Self { checker }
    }

    /// Probe the endpoint once. Details go to the log, not to the caller.
    pub async fn check_health(&self) -> HealthCheckResult {
        tracing::info!("Start health check");

        match self.checker.probe().await {
            Err(e) => {
                tracing::error!("Failed to check health: {:#}", e);
                HealthCheckResult::new(
                    HealthStatus::Error,
                    "Failed to check health. Please see logs for details.",
                )
            }
            Ok(status) if status > 299 => {
                tracing::error!("URL returns bad status code {}", status);
                HealthCheckResult::new(
                    HealthStatus::Error,
                    format!("URL returns status code {}. Please see logs for details.", status),
                )
            }
            Ok(status) => {
                tracing::info!("Succeed to check health with status code {}", status);
                HealthCheckResult::new(HealthStatus::Ok, "Data source is working")
            }
        }
    }
}
