//! HTTP API Handlers and Routes
//!
//! Built on axum.
//!
//! # Endpoints
//!
//! - `POST /orchestrate` - `{query, history?}` in, `{query, result}` out
//! - `GET /health` - status, active model and registered tool names
//! - `GET /api-docs/openapi.json` - OpenAPI document

/// Request handlers for all API endpoints.
pub mod handlers;
/// Router configuration and middleware.
pub mod routes;

use crate::types::{HealthResponse, Message, MessageRole, OrchestrationRequest, OrchestrationResult};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Relay", description = "Intent routing for tool-using assistants"),
    paths(handlers::orchestrate::orchestrate, handlers::health::health),
    components(schemas(
        OrchestrationRequest,
        OrchestrationResult,
        HealthResponse,
        Message,
        MessageRole
    )),
    tags(
        (name = "orchestration", description = "Query routing and tool execution"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
