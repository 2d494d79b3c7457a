#![cfg(feature = "openai")]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::ITINERARY_JSON;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tripweaver::agents::StubBackend;
use tripweaver::config::TravelConfig;
use tripweaver::domain::TravelerPrefs;
use tripweaver::error::TravelError;
use tripweaver::orchestrator::TravelOrchestrator;
use tripweaver::provider::openai::OpenAiProvider;
use tripweaver::provider::{create_provider, ModelProvider, ProviderRequest, ToolDefinition};
use tripweaver::types::{FinishReason, GenerationSettings, ModelMessage, ToolChoice};
use tripweaver::util::retry::RetryPolicy;

fn test_retry_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(1),
        multiplier: 1.0,
    }
}

fn provider(server: &MockServer, max_attempts: u32) -> OpenAiProvider {
    OpenAiProvider::new("gpt-5", "test-key".to_string(), Some(server.uri()))
        .with_retry_policy(test_retry_policy(max_attempts))
}

fn weather_request() -> ProviderRequest {
    ProviderRequest {
        messages: vec![
            ModelMessage::system("plan trips"),
            ModelMessage::user("weather in Lisbon?"),
        ],
        settings: GenerationSettings::builder()
            .temperature(0.2)
            .tool_choice(ToolChoice::Auto)
            .build(),
        tools: Some(vec![ToolDefinition {
            name: "call_weather_agent".into(),
            description: "Get a short-term weather summary".into(),
            parameters: json!({"type": "object", "properties": {"city": {"type": "string"}}}),
        }]),
    }
}

fn tool_call_body(id: &str, name: &str, arguments: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": id,
                    "type": "function",
                    "function": {"name": name, "arguments": arguments}
                }]
            },
            "finish_reason": "tool_calls"
        }],
        "usage": {"prompt_tokens": 50, "completion_tokens": 10, "total_tokens": 60}
    })
}

fn text_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 80,
            "completion_tokens": 40,
            "total_tokens": 120,
            "completion_tokens_details": {"reasoning_tokens": 16}
        }
    })
}

#[tokio::test]
async fn sends_tools_and_settings_and_parses_tool_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-5",
            "temperature": 0.2,
            "tool_choice": "auto",
            "tools": [{"type": "function", "function": {"name": "call_weather_agent"}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_body(
            "call_abc",
            "call_weather_agent",
            r#"{"city":"Lisbon","start_date":"2025-06-01","end_date":"2025-06-03"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server, 1)
        .generate_text(&weather_request())
        .await
        .expect("request should succeed");

    assert!(response.text.is_empty());
    assert_eq!(response.finish_reason, Some(FinishReason::ToolCalls));
    assert_eq!(response.usage.total_tokens, 60);
    assert_eq!(response.tool_calls.len(), 1);
    let call = &response.tool_calls[0];
    assert_eq!(call.id, "call_abc");
    assert_eq!(call.name, "call_weather_agent");
    assert_eq!(call.arguments["city"], "Lisbon");
}

#[tokio::test]
async fn parses_text_and_reasoning_usage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("hello")))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server, 1)
        .generate_text(&weather_request())
        .await
        .expect("request should succeed");

    assert_eq!(response.text, "hello");
    assert_eq!(response.finish_reason, Some(FinishReason::Stop));
    assert_eq!(response.usage.input_tokens, 80);
    assert_eq!(response.usage.reasoning_tokens, Some(16));
    assert!(response.tool_calls.is_empty());
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider(&server, 3)
        .generate_text(&weather_request())
        .await
        .expect_err("401 should fail");

    assert!(matches!(err, TravelError::Authentication(ref body) if body.contains("Incorrect API key")));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn retries_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"message": "upstream overloaded"}
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("recovered")))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server, 2)
        .generate_text(&weather_request())
        .await
        .expect("second attempt should succeed");

    assert_eq!(response.text, "recovered");
}

#[tokio::test]
async fn server_error_surfaces_after_last_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"message": "unavailable"}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let err = provider(&server, 2)
        .generate_text(&weather_request())
        .await
        .expect_err("all attempts fail");

    assert!(matches!(err, TravelError::Api { status: 503, ref message } if message == "unavailable"));
}

#[tokio::test]
async fn slow_responses_surface_as_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_body("too late"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = provider(&server, 1)
        .with_timeout(Duration::from_millis(50))
        .generate_text(&weather_request())
        .await
        .expect_err("request should time out");

    assert!(matches!(err, TravelError::Timeout(50)), "unexpected error: {err:?}");
    assert!(err.is_retryable());
}

#[test]
fn create_provider_requires_api_key() {
    let config = TravelConfig::default();

    let err = match create_provider(&config) {
        Ok(_) => panic!("expected missing key error"),
        Err(err) => err,
    };
    assert!(err.to_string().contains("OPENAI_API_KEY"), "unexpected error: {err}");
}

#[tokio::test]
async fn plans_over_http_with_tool_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_call_body(
            "call_w1",
            "call_weather_agent",
            r#"{"city":"Vancouver","start_date":"2025-10-10","end_date":"2025-10-12"}"#,
        )))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("\"tool_call_id\":\"call_w1\""))
        .and(body_string_contains("\"name\":\"call_weather_agent\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body(ITINERARY_JSON)))
        .expect(1)
        .mount(&server)
        .await;

    let config = TravelConfig {
        api_key: Some("test-key".into()),
        base_url: server.uri(),
        ..TravelConfig::default()
    };
    let planner = TravelOrchestrator::from_config(&config, Arc::new(StubBackend::new()))
        .expect("planner");

    let prefs = TravelerPrefs::new("SFO", "Vancouver", "2025-10-10");
    let outcome = planner
        .run("Weekend in Vancouver", &prefs, false)
        .await
        .expect("plan should succeed");

    assert_eq!(outcome.steps, 2);
    assert_eq!(outcome.usage.total_tokens, 180);
    assert_eq!(outcome.trip.weather.expect("weather").dates.len(), 3);
    assert_eq!(outcome.itinerary.est_total_currency, "USD");
}
