//! End-to-end orchestration tests with a scripted model and counting tools.

mod common;

use common::mocks::{CountingTool, MockLLMClient};
use relay::agents::orchestrator::EMPTY_QUERY;
use relay::llm::ProviderError;
use relay::tools::calculator::Calculator;
use relay::tools::ToolRegistry;
use relay::types::{Message, MessageRole};
use relay::Orchestrator;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

struct Harness {
    llm: Arc<MockLLMClient>,
    weather: Arc<CountingTool>,
    news: Arc<CountingTool>,
    orchestrator: Orchestrator,
}

fn harness(llm: MockLLMClient) -> Harness {
    let llm = Arc::new(llm);
    let weather = Arc::new(CountingTool::weather("Sunny in Paris"));
    let news = Arc::new(CountingTool::news("Top headlines"));
    let registry = ToolRegistry::builder()
        .with_tool(weather.clone())
        .with_tool(news.clone())
        .with_tool(Arc::new(Calculator))
        .build()
        .unwrap();
    let orchestrator = Orchestrator::new(llm.clone(), Arc::new(registry));
    Harness {
        llm,
        weather,
        news,
        orchestrator,
    }
}

#[rstest]
#[case("3*2", "6")]
#[case(" 4 * (3 + 2) ", "20")]
#[case("7/2", "3.5")]
#[case("3/0", "Calculation failed. Check the math expression.")]
#[case("1 +", "Calculation failed. Check the math expression.")]
#[tokio::test]
async fn test_arithmetic_never_calls_model(#[case] query: &str, #[case] expected: &str) {
    let h = harness(MockLLMClient::new());
    let answer = h.orchestrator.orchestrate(query, &[]).await;
    assert_eq!(answer.query, query.trim());
    assert_eq!(answer.result, expected);
    assert_eq!(h.llm.total_calls(), 0);
}

#[tokio::test]
async fn test_empty_query_rejected_without_model_call() {
    let h = harness(MockLLMClient::new());
    let answer = h.orchestrator.orchestrate("   ", &[]).await;
    assert_eq!(answer.query, "");
    assert_eq!(answer.result, EMPTY_QUERY);
    assert_eq!(h.llm.total_calls(), 0);
}

#[tokio::test]
async fn test_weather_query_routes_to_weather_once() {
    let h = harness(MockLLMClient::new().routing_to("get_weather", json!({"city": "Paris"})));

    let answer = h
        .orchestrator
        .orchestrate("What's the weather in Paris?", &[])
        .await;

    assert_eq!(answer.result, "Sunny in Paris");
    assert_eq!(h.weather.calls(), 1);
    assert_eq!(h.news.calls(), 0);
    assert_eq!(
        h.weather.last_args().unwrap(),
        json!({"city": "Paris"}).as_object().unwrap().clone()
    );
    assert_eq!(h.llm.structured_calls.lock().len(), 1);
    assert!(h.llm.chat_calls.lock().is_empty());
}

#[tokio::test]
async fn test_worded_arithmetic_goes_through_router() {
    let h = harness(MockLLMClient::new().routing_to("calculator", json!({"expression": "3*2"})));
    let answer = h.orchestrator.orchestrate("Calculate 3*2", &[]).await;
    assert_eq!(answer.result, "6");
    assert_eq!(h.llm.structured_calls.lock().len(), 1);
}

#[tokio::test]
async fn test_router_sees_catalog_history_and_query() {
    let h = harness(MockLLMClient::new().routing_to("get_news", json!({"topic": "Rust"})));
    let history = vec![
        Message::user("hello"),
        Message::assistant("Hi! How can I help?"),
    ];

    h.orchestrator.orchestrate("Rust news please", &history).await;

    let calls = h.llm.structured_calls.lock();
    let messages = &calls[0];
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].role, MessageRole::System);
    for name in ["get_weather", "get_news", "calculator", "fallback"] {
        assert!(messages[0].content.contains(name), "prompt lacks {}", name);
    }
    assert_eq!(&messages[1..3], history.as_slice());
    assert_eq!(messages[3], Message::user("Rust news please"));
}

#[tokio::test]
async fn test_fallback_reply_returned_verbatim() {
    let h = harness(
        MockLLMClient::new()
            .routing_to("fallback", json!({}))
            .with_chat(Ok("Because of the jet stream.".to_string())),
    );
    let history = vec![
        Message::user("weather in Paris"),
        Message::assistant("Rainy"),
    ];

    let answer = h.orchestrator.orchestrate("why is that?", &history).await;

    assert_eq!(answer.result, "Because of the jet stream.");
    let chat_calls = h.llm.chat_calls.lock();
    let messages = &chat_calls[0];
    assert_eq!(
        messages[0],
        Message::system("You are a helpful and conversational assistant.")
    );
    assert!(!messages[0].content.contains("get_weather"));
    assert_eq!(&messages[1..3], history.as_slice());
    assert_eq!(messages[3], Message::user("why is that?"));
    assert_eq!(h.weather.calls() + h.news.calls(), 0);
}

#[tokio::test]
async fn test_blank_fallback_reply_never_yields_empty_result() {
    let h = harness(
        MockLLMClient::new()
            .routing_to("fallback", json!({}))
            .with_chat(Ok(String::new())),
    );
    let answer = h.orchestrator.orchestrate("tell me more", &[]).await;
    assert!(!answer.result.is_empty());
    assert!(
        answer
            .result
            .starts_with("An unexpected error occurred in the agent logic: Malformed provider response"),
        "{}",
        answer.result
    );
}

#[tokio::test]
async fn test_unknown_tool_invokes_nothing() {
    let h = harness(MockLLMClient::new().routing_to("get_horoscope", json!({"sign": "leo"})));
    let answer = h.orchestrator.orchestrate("my horoscope", &[]).await;
    assert_eq!(
        answer.result,
        "Error: The LLM chose a tool ('get_horoscope') that does not exist."
    );
    assert_eq!(h.weather.calls() + h.news.calls(), 0);
}

#[tokio::test]
async fn test_mistyped_arguments_rejected_before_invocation() {
    let h = harness(MockLLMClient::new().routing_to("get_weather", json!({"city": 75001})));
    let answer = h.orchestrator.orchestrate("weather at 75001", &[]).await;
    assert!(answer.result.contains("get_weather"), "{}", answer.result);
    assert!(answer.result.contains("invalid arguments"), "{}", answer.result);
    assert_eq!(h.weather.calls(), 0);
}

#[rstest]
#[case(
    "Rate limit reached for model. Please try again in 4.2s. Need more tokens?",
    "It looks like I'm a bit popular right now! Please wait about 5 seconds and try again."
)]
#[case(
    "Rate limit reached for model.",
    "I'm experiencing high traffic right now. Please try again in a moment."
)]
#[tokio::test]
async fn test_rate_limit_messages(#[case] provider_message: &str, #[case] expected: &str) {
    let h = harness(MockLLMClient::new().with_structured(Err(ProviderError::RateLimited {
        status: 429,
        message: provider_message.to_string(),
    })));
    let answer = h.orchestrator.orchestrate("news about rust", &[]).await;
    assert_eq!(answer.result, expected);
}

#[tokio::test]
async fn test_rate_limit_during_fallback() {
    let h = harness(
        MockLLMClient::new()
            .routing_to("fallback", json!({}))
            .with_chat(Err(ProviderError::RateLimited {
                status: 429,
                message: "Please try again in 2s".to_string(),
            })),
    );
    let answer = h.orchestrator.orchestrate("tell me more", &[]).await;
    assert_eq!(
        answer.result,
        "It looks like I'm a bit popular right now! Please wait about 2 seconds and try again."
    );
}

#[tokio::test]
async fn test_unparseable_provider_error() {
    let h = harness(MockLLMClient::new().with_structured(Err(ProviderError::UnparseableError {
        status: 503,
        body: "Service Unavailable".to_string(),
    })));
    let answer = h.orchestrator.orchestrate("news about rust", &[]).await;
    assert_eq!(answer.result, "An API error occurred (Status Code: 503).");
}

#[rstest]
#[case("I think you want the weather tool")]
#[case(r#"{"tool": "get_weather"}"#)]
#[case(r#"{"tool_name": "get_weather", "arguments": ["Paris"]}"#)]
#[tokio::test]
async fn test_malformed_router_output(#[case] raw: &str) {
    let h = harness(MockLLMClient::new().with_structured(Ok(raw.to_string())));
    let answer = h.orchestrator.orchestrate("weather in Paris", &[]).await;
    assert!(
        answer
            .result
            .starts_with("An unexpected error occurred in the agent logic: Malformed model response"),
        "{}",
        answer.result
    );
    assert_eq!(h.weather.calls(), 0);
}

#[tokio::test]
async fn test_transport_error_is_unexpected() {
    let h = harness(MockLLMClient::new().with_structured(Err(ProviderError::Transport {
        message: "Request to the language model timed out".to_string(),
        timed_out: true,
    })));
    let answer = h.orchestrator.orchestrate("news about rust", &[]).await;
    assert_eq!(
        answer.result,
        "An unexpected error occurred in the agent logic: Request to the language model timed out"
    );
}

#[tokio::test]
async fn test_catalog_choice_round_trip() {
    // Every registry key offered in the catalog routes back to itself.
    for (tool, args) in [
        ("get_weather", json!({"city": "Oslo"})),
        ("get_news", json!({"topic": "chips"})),
        ("calculator", json!({"expression": "1+1"})),
    ] {
        let h = harness(MockLLMClient::new().routing_to(tool, args));
        let answer = h.orchestrator.orchestrate("something", &[]).await;
        assert!(
            !answer.result.contains("does not exist"),
            "{} did not resolve: {}",
            tool,
            answer.result
        );
    }
}
