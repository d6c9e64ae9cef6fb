//! Shared test helpers: a scripted provider and a scripted session.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rmcp::model::JsonObject;

use conduit::error::ConduitError;
use conduit::mcp::{MCPSessionOps, MemberDescriptor, ToolOutcome};
use conduit::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use conduit::types::*;

/// A mock provider that returns canned responses and records every request.
pub struct MockProvider {
    model_id: String,
    responses: Mutex<Vec<Result<ProviderResponse, ConduitError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    /// Queue a response requesting the given calls, with optional text.
    pub fn queue_tool_calls(&self, text: &str, calls: &[(&str, &str, serde_json::Value)]) {
        self.responses.lock().unwrap().push(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls: calls
                .iter()
                .map(|(id, name, arguments)| AgentToolCall {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                    arguments: arguments.clone(),
                })
                .collect(),
            finish_reason: Some(FinishReason::ToolCalls),
        }));
    }

    pub fn queue_error(&self, error: ConduitError) {
        self.responses.lock().unwrap().push(Err(error));
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
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
    ) -> Result<ProviderResponse, ConduitError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(ProviderResponse {
                text: "Mock response".to_string(),
                ..Default::default()
            });
        }
        responses.remove(0)
    }
}

/// A session with fixed listings and scripted tool outcomes.
///
/// Tools without a scripted outcome echo their `message` argument, or fail
/// when it is missing.
#[derive(Default)]
pub struct MockSession {
    pub tools: Vec<MemberDescriptor>,
    pub prompts: Vec<MemberDescriptor>,
    pub resources: Vec<MemberDescriptor>,
    pub failing_listings: HashMap<&'static str, String>,
    pub outcomes: HashMap<String, ToolOutcome>,
    pub calls: Vec<(String, JsonObject)>,
}

impl MockSession {
    /// A session advertising a single `echo(message)` tool.
    pub fn with_echo() -> Self {
        Self {
            tools: vec![MemberDescriptor::tool(
                "echo",
                Some("Echo back the provided message.".into()),
                Some(serde_json::json!({
                    "type": "object",
                    "properties": { "message": { "type": "string" } },
                    "required": ["message"]
                })),
            )],
            ..Default::default()
        }
    }

    pub fn fail_listing(mut self, operation: &'static str, message: &str) -> Self {
        self.failing_listings.insert(operation, message.to_string());
        self
    }

    pub fn with_outcome(mut self, tool: &str, outcome: ToolOutcome) -> Self {
        self.outcomes.insert(tool.to_string(), outcome);
        self
    }

    pub fn called_tools(&self) -> Vec<&str> {
        self.calls.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn listing(
        &self,
        operation: &'static str,
        members: &[MemberDescriptor],
    ) -> Result<Vec<MemberDescriptor>, ConduitError> {
        match self.failing_listings.get(operation) {
            Some(message) => Err(ConduitError::remote(operation, message.as_str())),
            None => Ok(members.to_vec()),
        }
    }
}

#[async_trait]
impl MCPSessionOps for MockSession {
    async fn list_tools(&mut self) -> Result<Vec<MemberDescriptor>, ConduitError> {
        self.listing("tools/list", &self.tools)
    }

    async fn list_prompts(&mut self) -> Result<Vec<MemberDescriptor>, ConduitError> {
        self.listing("prompts/list", &self.prompts)
    }

    async fn list_resources(&mut self) -> Result<Vec<MemberDescriptor>, ConduitError> {
        self.listing("resources/list", &self.resources)
    }

    async fn call_tool(&mut self, name: &str, arguments: JsonObject) -> ToolOutcome {
        self.calls.push((name.to_string(), arguments.clone()));
        if let Some(outcome) = self.outcomes.get(name) {
            return outcome.clone();
        }
        match arguments.get("message").and_then(|value| value.as_str()) {
            Some(message) => ToolOutcome::success(message),
            None => ToolOutcome::failure(format!("{name}: missing required argument 'message'")),
        }
    }
}
