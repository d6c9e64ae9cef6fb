//! Descriptors for the members an MCP server advertises.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Kind of server member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemberKind {
    Tool,
    Prompt,
    Resource,
}

/// Snapshot of one advertised tool, prompt, or resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    pub kind: MemberKind,
    pub name: String,
    pub description: Option<String>,
    /// JSON Schema for tool parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<serde_json::Value>,
    /// Resource URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl MemberDescriptor {
    pub fn tool(
        name: impl Into<String>,
        description: Option<String>,
        input_schema: Option<serde_json::Value>,
    ) -> Self {
        Self {
            kind: MemberKind::Tool,
            name: name.into(),
            description,
            input_schema,
            uri: None,
        }
    }

    pub fn prompt(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            kind: MemberKind::Prompt,
            name: name.into(),
            description,
            input_schema: None,
            uri: None,
        }
    }

    pub fn resource(
        name: impl Into<String>,
        description: Option<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            kind: MemberKind::Resource,
            name: name.into(),
            description,
            input_schema: None,
            uri: Some(uri.into()),
        }
    }
}

impl From<rmcp::model::Tool> for MemberDescriptor {
    fn from(tool: rmcp::model::Tool) -> Self {
        Self::tool(
            tool.name.to_string(),
            tool.description.map(|d| d.to_string()),
            Some(serde_json::Value::Object((*tool.input_schema).clone())),
        )
    }
}

impl From<rmcp::model::Prompt> for MemberDescriptor {
    fn from(prompt: rmcp::model::Prompt) -> Self {
        Self::prompt(prompt.name, prompt.description)
    }
}

impl From<rmcp::model::Resource> for MemberDescriptor {
    fn from(resource: rmcp::model::Resource) -> Self {
        let raw = resource.raw;
        Self::resource(raw.name, raw.description, raw.uri)
    }
}
