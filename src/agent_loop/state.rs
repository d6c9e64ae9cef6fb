//! Phases of one query/response turn.
//!
//! ```text
//! AwaitingInitialCompletion ─(no tool calls)──────────────────────────────────────► Done
//! AwaitingInitialCompletion ─► ToolCallsRequested ─► ExecutingTools ─► AwaitingFinalCompletion ─► Done
//! ```
//!
//! A turn makes at most one tool round, and only the initial completion is
//! offered tool declarations.

use crate::error::ConduitError;
use crate::types::AgentToolCall;

#[derive(Debug, Clone, PartialEq)]
pub enum TurnPhase {
    AwaitingInitialCompletion,
    ToolCallsRequested { calls: Vec<AgentToolCall> },
    ExecutingTools { calls: Vec<AgentToolCall> },
    AwaitingFinalCompletion,
    Done,
}

impl TurnPhase {
    pub fn new() -> Self {
        Self::AwaitingInitialCompletion
    }

    /// The initial completion arrived with `calls` requested.
    pub fn on_initial_completion(self, calls: Vec<AgentToolCall>) -> Result<Self, ConduitError> {
        match self {
            Self::AwaitingInitialCompletion if calls.is_empty() => Ok(Self::Done),
            Self::AwaitingInitialCompletion => Ok(Self::ToolCallsRequested { calls }),
            other => Err(invalid_transition(&other, "initial completion")),
        }
    }

    /// Requested calls were recorded in the conversation; start running them.
    pub fn begin_execution(self) -> Result<Self, ConduitError> {
        match self {
            Self::ToolCallsRequested { calls } => Ok(Self::ExecutingTools { calls }),
            other => Err(invalid_transition(&other, "tool execution")),
        }
    }

    /// Every requested call has a result in the conversation.
    pub fn on_tools_executed(self) -> Result<Self, ConduitError> {
        match self {
            Self::ExecutingTools { .. } => Ok(Self::AwaitingFinalCompletion),
            other => Err(invalid_transition(&other, "tool results")),
        }
    }

    pub fn on_final_completion(self) -> Result<Self, ConduitError> {
        match self {
            Self::AwaitingFinalCompletion => Ok(Self::Done),
            other => Err(invalid_transition(&other, "final completion")),
        }
    }

    /// Whether a completion requested in this phase carries tool declarations.
    pub fn offers_tools(&self) -> bool {
        matches!(self, Self::AwaitingInitialCompletion)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingInitialCompletion => "awaiting_initial_completion",
            Self::ToolCallsRequested { .. } => "tool_calls_requested",
            Self::ExecutingTools { .. } => "executing_tools",
            Self::AwaitingFinalCompletion => "awaiting_final_completion",
            Self::Done => "done",
        }
    }
}

impl Default for TurnPhase {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid_transition(phase: &TurnPhase, event: &str) -> ConduitError {
    ConduitError::InvalidState(format!("unexpected {event} in phase {}", phase.name()))
}
