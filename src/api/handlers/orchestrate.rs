use crate::{
    types::{OrchestrationRequest, OrchestrationResult},
    AppState,
};
use axum::{extract::State, Json};

/// Route a query to a tool (or the conversational fallback) and return its answer
///
/// Always answers 200. Failures are reported in `result` as readable text.
#[utoipa::path(
    post,
    path = "/orchestrate",
    request_body = OrchestrationRequest,
    responses(
        (status = 200, description = "Orchestration result", body = OrchestrationResult),
        (status = 400, description = "Body is not valid JSON"),
        (status = 422, description = "Body does not match the request shape")
    ),
    tag = "orchestration"
)]
pub async fn orchestrate(
    State(state): State<AppState>,
    Json(payload): Json<OrchestrationRequest>,
) -> Json<OrchestrationResult> {
    Json(
        state
            .orchestrator
            .orchestrate(&payload.query, &payload.history)
            .await,
    )
}
