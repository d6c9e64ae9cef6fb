//! Drives one query through the backend and the server's tools.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::chat::QueryHandler;
use crate::error::ConduitError;
use crate::mcp::{MCPSessionOps, MemberKind};
use crate::provider::{ModelProvider, ProviderRequest, ProviderResponse, ToolDefinition};
use crate::types::{AgentToolResult, GenerationSettings, ModelMessage, Usage};

use super::state::TurnPhase;
use super::tooling::{execute_tool_call, tool_declaration};

const ANSWER_LABEL: &str = "Assistant: ";

/// Everything a finished turn produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Labelled answer: initial text, one log line per tool call, final text.
    pub answer: String,
    /// The conversation as last sent to the backend.
    pub conversation: Vec<ModelMessage>,
    /// Results in the order the calls were requested.
    pub tool_results: Vec<AgentToolResult>,
    /// Token usage summed over both completions.
    pub usage: Usage,
}

/// Turns one user query into one answer, with at most one tool round.
///
/// Borrows the session for its lifetime; the caller owns opening and
/// closing it.
pub struct ToolCallingOrchestrator<'a, S: ?Sized> {
    session: &'a mut S,
    provider: Arc<dyn ModelProvider>,
    settings: GenerationSettings,
}

impl<'a, S> ToolCallingOrchestrator<'a, S>
where
    S: MCPSessionOps + ?Sized,
{
    pub fn new(session: &'a mut S, provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            session,
            provider,
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Run the full turn and return the answer with its conversation.
    ///
    /// Backend and tool-listing errors propagate; tool call failures are
    /// folded into the conversation as error results.
    pub async fn run_turn(&mut self, query: &str) -> Result<TurnOutcome, ConduitError> {
        let mut conversation = vec![ModelMessage::user(query)];
        let declarations = self.tool_declarations().await?;
        debug!(tools = declarations.len(), "declared tools for turn");

        let mut phase = TurnPhase::new();
        let mut parts: Vec<String> = Vec::new();
        let mut initial_text = String::new();
        let mut tool_results = Vec::new();
        let mut usage = Usage::default();

        while !phase.is_done() {
            let offered = phase.offers_tools().then(|| declarations.clone());
            phase = match phase {
                TurnPhase::AwaitingInitialCompletion => {
                    let response = self.complete(&conversation, offered).await?;
                    usage.merge(&response.usage);
                    if !response.text.is_empty() {
                        parts.push(response.text.clone());
                    }
                    initial_text = response.text;
                    TurnPhase::AwaitingInitialCompletion.on_initial_completion(response.tool_calls)?
                }
                TurnPhase::ToolCallsRequested { calls } => {
                    conversation.push(ModelMessage::assistant_with_tool_calls(
                        initial_text.as_str(),
                        &calls,
                    ));
                    TurnPhase::ToolCallsRequested { calls }.begin_execution()?
                }
                TurnPhase::ExecutingTools { calls } => {
                    for call in &calls {
                        let executed = execute_tool_call(&mut *self.session, call).await;
                        parts.push(executed.log);
                        conversation.push(ModelMessage::tool_result(executed.result.clone()));
                        tool_results.push(executed.result);
                    }
                    TurnPhase::ExecutingTools { calls }.on_tools_executed()?
                }
                TurnPhase::AwaitingFinalCompletion => {
                    let response = self.complete(&conversation, offered).await?;
                    usage.merge(&response.usage);
                    if !response.text.is_empty() {
                        parts.push(response.text);
                    }
                    TurnPhase::AwaitingFinalCompletion.on_final_completion()?
                }
                TurnPhase::Done => TurnPhase::Done,
            };
        }

        info!(
            tool_calls = tool_results.len(),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "turn complete"
        );

        Ok(TurnOutcome {
            answer: format!("{ANSWER_LABEL}{}", parts.join("\n")),
            conversation,
            tool_results,
            usage,
        })
    }

    /// Run the turn and return only the answer text.
    pub async fn process_query(&mut self, query: &str) -> Result<String, ConduitError> {
        Ok(self.run_turn(query).await?.answer)
    }

    async fn tool_declarations(&mut self) -> Result<Vec<ToolDefinition>, ConduitError> {
        Ok(self
            .session
            .list_tools()
            .await?
            .into_iter()
            .filter(|member| member.kind == MemberKind::Tool)
            .map(tool_declaration)
            .collect())
    }

    async fn complete(
        &mut self,
        conversation: &[ModelMessage],
        tools: Option<Vec<ToolDefinition>>,
    ) -> Result<ProviderResponse, ConduitError> {
        let request = ProviderRequest {
            messages: conversation.to_vec(),
            settings: self.settings.clone(),
            tools,
        };
        debug!(
            provider = self.provider.provider_name(),
            model = self.provider.model_id(),
            messages = request.messages.len(),
            offers_tools = request.tools.is_some(),
            "requesting completion"
        );
        self.provider.generate_text(&request).await
    }
}

#[async_trait]
impl<S> QueryHandler for ToolCallingOrchestrator<'_, S>
where
    S: MCPSessionOps + ?Sized,
{
    async fn handle_query(&mut self, query: &str) -> Result<String, ConduitError> {
        self.process_query(query).await
    }
}
