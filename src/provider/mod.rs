//! Model provider trait and the built-in chat-completions backend.

pub mod http;

#[cfg(feature = "openai")]
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ConduitConfig;
use crate::error::ConduitError;
use crate::types::{AgentToolCall, FinishReason, GenerationSettings, ModelMessage, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    /// Tools offered for this completion; `None` means no tools are offered.
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: String,
    pub tool_calls: Vec<AgentToolCall>,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by completion backends.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Request one completion for the given conversation.
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, ConduitError>;
}

/// Create the configured provider.
///
/// Fails with a configuration error when the credential is missing, so callers
/// can do this before acquiring any other resource.
#[allow(unused_variables)]
pub fn create_provider(config: &ConduitConfig) -> Result<Box<dyn ModelProvider>, ConduitError> {
    #[cfg(feature = "openai")]
    {
        let api_key = config.require_api_key()?.to_string();
        Ok(Box::new(openai::OpenAiProvider::new(
            config.model(),
            api_key,
            config.base_url().map(str::to_string),
        )))
    }
    #[cfg(not(feature = "openai"))]
    {
        Err(ConduitError::Configuration(
            "No completion backend enabled via feature flags".into(),
        ))
    }
}
