use crate::{types::HealthResponse, AppState};
use axum::{extract::State, Json};

/// Health check with the active model and registered tools
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.llm.model_name().to_string(),
        tools: state.registry.tool_names(),
    })
}
