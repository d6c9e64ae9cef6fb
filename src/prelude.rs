//! Convenience re-exports for common use.

pub use crate::agent_loop::{ToolCallingOrchestrator, TurnOutcome, TurnPhase};
pub use crate::chat::{ChatExit, ChatLoop, QueryHandler};
pub use crate::config::ConduitConfig;
pub use crate::error::{ConduitError, ErrorCategory, Result};
pub use crate::mcp::{
    list_all, MCPSession, MCPSessionOps, MemberDescriptor, MemberKind, ServerLaunch, ToolOutcome,
};
pub use crate::provider::{create_provider, ModelProvider, ProviderRequest, ProviderResponse};
pub use crate::types::{AgentToolCall, AgentToolResult, GenerationSettings, ModelMessage, Role};
