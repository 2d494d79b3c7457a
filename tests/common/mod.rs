//! Shared test helpers and mock provider.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use tripweaver::error::TravelError;
use tripweaver::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use tripweaver::types::*;

/// A minimal itinerary that parses.
pub const ITINERARY_JSON: &str = r#"{
  "summary": "Three days in Vancouver",
  "flights": [],
  "hotel": null,
  "weather": null,
  "events": [],
  "plan": [{"date": "2025-10-10", "morning": "Arrive", "afternoon": null, "evening": "Dinner", "notes": null}],
  "est_total_currency": "USD",
  "est_total_amount": 1000.0
}"#;

/// A mock provider that replays scripted responses and records requests.
pub struct MockProvider {
    model_id: String,
    responses: Mutex<VecDeque<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push_back(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
                ..Default::default()
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        });
    }

    /// Queue a single tool call response.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: Value) {
        self.queue_tool_calls(&[(id, name, args)]);
    }

    /// Queue one response carrying several tool calls.
    pub fn queue_tool_calls(&self, calls: &[(&str, &str, Value)]) {
        self.responses.lock().unwrap().push_back(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
                ..Default::default()
            },
            tool_calls: calls
                .iter()
                .map(|(id, name, args)| AgentToolCall {
                    id: id.to_string(),
                    name: name.to_string(),
                    arguments: args.clone(),
                })
                .collect(),
            finish_reason: Some(FinishReason::ToolCalls),
        });
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, TravelError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| ProviderResponse {
            text: "Mock response".to_string(),
            ..Default::default()
        }))
    }
}

/// Tool turns from a request, as `(call id, tool name, result, is_error)`.
pub fn tool_turns(request: &ProviderRequest) -> Vec<(String, String, Value, bool)> {
    request
        .messages
        .iter()
        .filter(|m| m.role == Role::Tool)
        .filter_map(|m| {
            let part = m.tool_result_part()?;
            Some((
                part.tool_call_id.clone(),
                m.name.clone().unwrap_or_default(),
                part.result.clone(),
                part.is_error,
            ))
        })
        .collect()
}
