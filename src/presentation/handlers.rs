// HTTP request handlers
use crate::infrastructure::frame_mapper::{
    data_query_from_dto, health_to_dto, query_response_to_dto, HealthCheckDto, QueryDataRequest,
    QueryDataResponse,
};
use crate::presentation::app_state::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// Answer a batch of queries. Per-query failures are reported inside the body.
pub async fn query_data(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryDataRequest>,
) -> Json<QueryDataResponse> {
    let queries = request.queries.into_iter().map(data_query_from_dto).collect();
    let responses = state.query_service.query_data(queries).await;
    Json(query_response_to_dto(responses))
}

/// Check that the configured FIAP storage answers.
pub async fn check_health(State(state): State<Arc<AppState>>) -> Json<HealthCheckDto> {
    let result = state.health_service.check_health().await;
    Json(health_to_dto(result))
}
