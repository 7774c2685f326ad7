// Application state for HTTP handlers
use crate::application::health_service::HealthService;
use crate::application::query_service::QueryService;

#[derive(Clone)]
pub struct AppState {
    pub query_service: QueryService,
    pub health_service: HealthService,
}
