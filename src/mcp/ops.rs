//! Operations the catalog lister and orchestrator need from a session.

use async_trait::async_trait;
use rmcp::model::JsonObject;

use crate::error::ConduitError;

use super::schema::MemberDescriptor;

/// Outcome of one tool invocation. Failures are values, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Success { text: String },
    Failure { message: String },
}

impl ToolOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

/// Remote operations on a live MCP session.
///
/// Methods take `&mut self`: one request is outstanding at a time.
#[async_trait]
pub trait MCPSessionOps: Send {
    async fn list_tools(&mut self) -> Result<Vec<MemberDescriptor>, ConduitError>;

    async fn list_prompts(&mut self) -> Result<Vec<MemberDescriptor>, ConduitError>;

    async fn list_resources(&mut self) -> Result<Vec<MemberDescriptor>, ConduitError>;

    async fn call_tool(&mut self, name: &str, arguments: JsonObject) -> ToolOutcome;
}
