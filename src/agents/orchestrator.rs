use crate::{
    agents::{executor::CapabilityExecutor, failure, fast_path, router::IntentRouter},
    llm::LLMClient,
    tools::{calculator, ToolRegistry},
    types::{AppError, Message, OrchestrationResult, Result},
};
use std::sync::Arc;

pub const EMPTY_QUERY: &str = "Please enter a query.";

/// Single entry point: query + history in, `{query, result}` out.
///
/// Never fails. Every error is rendered into `result`.
pub struct Orchestrator {
    router: IntentRouter,
    executor: CapabilityExecutor,
    model: String,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn LLMClient>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            model: llm.model_name().to_string(),
            router: IntentRouter::new(llm.clone(), registry.clone()),
            executor: CapabilityExecutor::new(llm, registry),
        }
    }

    pub async fn orchestrate(&self, query: &str, history: &[Message]) -> OrchestrationResult {
        let query = query.trim();
        tracing::info!(query, history_len = history.len(), "Received query");

        if query.is_empty() {
            return OrchestrationResult::new(query, EMPTY_QUERY);
        }

        if fast_path::is_arithmetic(query) {
            tracing::info!("Math intent detected. Bypassing LLM and using calculator directly.");
            return OrchestrationResult::new(query, calculator::calculate(query));
        }

        let result = match self.route_and_execute(query, history).await {
            Ok(text) => text,
            Err(AppError::Provider(err)) => {
                tracing::error!(error = %err, status = ?err.status(), "LLM call failed");
                failure::classify(&err)
            }
            Err(other) => failure::unexpected(&other),
        };

        OrchestrationResult::new(query, result)
    }

    async fn route_and_execute(&self, query: &str, history: &[Message]) -> Result<String> {
        tracing::info!(model = %self.model, query, "Orchestrating with LLM");
        let choice = self.router.route(query, history).await?;
        self.executor.execute(&choice, query, history).await
    }
}
