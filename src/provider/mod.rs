//! Model provider trait and implementations.

pub mod format;
pub mod http;

#[cfg(feature = "openai")]
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::TravelConfig;
use crate::error::TravelError;
use crate::types::{AgentToolCall, FinishReason, GenerationSettings, ModelMessage, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<AgentToolCall>,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by all model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate a single (non-streaming) completion.
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, TravelError>;
}

/// Create the provider described by the config.
#[cfg(feature = "openai")]
pub fn create_provider(config: &TravelConfig) -> Result<Arc<dyn ModelProvider>, TravelError> {
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| TravelError::Configuration("Please set OPENAI_API_KEY".into()))?;
    let provider = openai::OpenAiProvider::new(
        config.model.clone(),
        api_key,
        Some(config.base_url.clone()),
    )
    .with_timeout(std::time::Duration::from_secs(config.request_timeout_secs));
    Ok(Arc::new(provider))
}

/// Create the provider described by the config.
#[cfg(not(feature = "openai"))]
pub fn create_provider(_config: &TravelConfig) -> Result<Arc<dyn ModelProvider>, TravelError> {
    Err(TravelError::Configuration(
        "No provider enabled via feature flags".into(),
    ))
}
