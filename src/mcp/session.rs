//! A live connection to one MCP server process.

use async_trait::async_trait;
use rmcp::{
    model::{
        CallToolRequestParams, CallToolResult, ClientInfo, Content, JsonObject, ProtocolVersion,
        ResourceContents,
    },
    service::{ClientInitializeError, ServiceError},
};
use tracing::{debug, info, warn};

use crate::error::ConduitError;

use super::launch::ServerLaunch;
use super::ops::{MCPSessionOps, ToolOutcome};
use super::schema::MemberDescriptor;
use super::transport::{MCPRunningService, MCPTransport, StdioTransport};

/// Name and version the server reported during the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    pub name: String,
    pub version: String,
}

/// Session over an initialized rmcp service.
///
/// Owned by whoever opened it. [`MCPSession::close`] releases the server
/// exactly once; dropping an unclosed session cancels the service, which
/// kills the child process.
pub struct MCPSession {
    service: Option<MCPRunningService>,
}

impl MCPSession {
    /// Spawn the server described by `launch` and complete the handshake.
    pub async fn open(launch: &ServerLaunch) -> Result<Self, ConduitError> {
        let mut transport = StdioTransport::from_launch(launch);
        let session = Self::connect(&mut transport).await?;
        info!(
            command = launch.command(),
            server = ?session.server_info().map(|s| s.name),
            "MCP session opened"
        );
        Ok(session)
    }

    /// Handshake over an arbitrary transport.
    ///
    /// Offers the latest protocol version first and retries once with
    /// 2024-11-05 if the server rejects the version.
    pub async fn connect(transport: &mut dyn MCPTransport) -> Result<Self, ConduitError> {
        let latest_client_info = ClientInfo {
            protocol_version: ProtocolVersion::LATEST,
            ..Default::default()
        };

        let service = match transport.connect(latest_client_info).await {
            Ok(service) => service,
            Err(error) if should_retry_protocol_fallback(&error) => {
                debug!("server rejected latest protocol version, retrying with 2024-11-05");
                let fallback_client_info = ClientInfo {
                    protocol_version: ProtocolVersion::V_2024_11_05,
                    ..Default::default()
                };
                transport
                    .connect(fallback_client_info)
                    .await
                    .map_err(map_client_initialize_error)?
            }
            Err(error) => return Err(map_client_initialize_error(error)),
        };

        Ok(Self::from_running_service(service))
    }

    /// Wrap an already-initialized rmcp service.
    pub fn from_running_service(service: MCPRunningService) -> Self {
        Self {
            service: Some(service),
        }
    }

    pub fn is_open(&self) -> bool {
        self.service
            .as_ref()
            .is_some_and(|service| !service.is_closed())
    }

    pub fn server_info(&self) -> Option<ServerIdentity> {
        let info = self.service.as_ref()?.peer_info()?;
        Some(ServerIdentity {
            name: info.server_info.name.clone(),
            version: info.server_info.version.clone(),
        })
    }

    /// Server-provided instructions, when the handshake carried any.
    pub fn instructions(&self) -> Option<String> {
        self.service
            .as_ref()?
            .peer_info()?
            .instructions
            .clone()
    }

    /// Terminate the server and release the stream.
    ///
    /// Returns `true` when this call released the session and `false` when it
    /// had already been closed.
    pub async fn close(&mut self) -> Result<bool, ConduitError> {
        let Some(service) = self.service.take() else {
            return Ok(false);
        };
        let reason = service
            .cancel()
            .await
            .map_err(|e| ConduitError::Transport(format!("MCP session shutdown failed: {e}")))?;
        info!(?reason, "MCP session closed");
        Ok(true)
    }

    fn service_mut(&mut self) -> Result<&mut MCPRunningService, ConduitError> {
        match self.service.as_mut() {
            Some(service) if !service.is_closed() => Ok(service),
            Some(_) => Err(ConduitError::Transport(
                "MCP server closed the connection".into(),
            )),
            None => Err(ConduitError::Transport("MCP session is closed".into())),
        }
    }
}

impl Drop for MCPSession {
    fn drop(&mut self) {
        if self.service.is_some() {
            warn!("MCP session dropped without close; cancelling server");
        }
    }
}

#[async_trait]
impl MCPSessionOps for MCPSession {
    async fn list_tools(&mut self) -> Result<Vec<MemberDescriptor>, ConduitError> {
        let service = self.service_mut()?;
        let tools = match service.list_all_tools().await {
            Ok(tools) => tools,
            Err(ServiceError::UnexpectedResponse) => service
                .list_tools(None)
                .await
                .map(|page| page.tools)
                .map_err(|e| map_service_error("tools/list", e))?,
            Err(e) => return Err(map_service_error("tools/list", e)),
        };
        debug!(count = tools.len(), "listed tools");
        Ok(tools.into_iter().map(MemberDescriptor::from).collect())
    }

    async fn list_prompts(&mut self) -> Result<Vec<MemberDescriptor>, ConduitError> {
        let service = self.service_mut()?;
        let prompts = match service.list_all_prompts().await {
            Ok(prompts) => prompts,
            Err(ServiceError::UnexpectedResponse) => service
                .list_prompts(None)
                .await
                .map(|page| page.prompts)
                .map_err(|e| map_service_error("prompts/list", e))?,
            Err(e) => return Err(map_service_error("prompts/list", e)),
        };
        debug!(count = prompts.len(), "listed prompts");
        Ok(prompts.into_iter().map(MemberDescriptor::from).collect())
    }

    async fn list_resources(&mut self) -> Result<Vec<MemberDescriptor>, ConduitError> {
        let service = self.service_mut()?;
        let resources = match service.list_all_resources().await {
            Ok(resources) => resources,
            Err(ServiceError::UnexpectedResponse) => service
                .list_resources(None)
                .await
                .map(|page| page.resources)
                .map_err(|e| map_service_error("resources/list", e))?,
            Err(e) => return Err(map_service_error("resources/list", e)),
        };
        debug!(count = resources.len(), "listed resources");
        Ok(resources.into_iter().map(MemberDescriptor::from).collect())
    }

    async fn call_tool(&mut self, name: &str, arguments: JsonObject) -> ToolOutcome {
        let service = match self.service_mut() {
            Ok(service) => service,
            Err(e) => return ToolOutcome::failure(e.to_string()),
        };

        debug!(tool = name, "calling tool");
        let result = service
            .call_tool(CallToolRequestParams {
                meta: None,
                name: name.to_owned().into(),
                arguments: Some(arguments),
                task: None,
            })
            .await;

        match result {
            Ok(result) => map_call_result(name, result),
            Err(e) => {
                let error = map_service_error("tools/call", e);
                warn!(tool = name, %error, "tool call failed");
                ToolOutcome::failure(error.to_string())
            }
        }
    }
}

/// Text of the first content item; `Ok(None)` when there is no content.
fn first_content_text(content: &[Content]) -> Result<Option<String>, String> {
    let Some(item) = content.first() else {
        return Ok(None);
    };
    if let Some(text) = item.as_text() {
        return Ok(Some(text.text.clone()));
    }
    match item.as_resource().map(|embedded| &embedded.resource) {
        Some(ResourceContents::TextResourceContents { text, .. }) => Ok(Some(text.clone())),
        _ => Err("first content item is not text".to_string()),
    }
}

fn map_call_result(name: &str, result: CallToolResult) -> ToolOutcome {
    let text = first_content_text(&result.content);

    if result.is_error.unwrap_or(false) {
        let message = text
            .ok()
            .flatten()
            .or_else(|| result.structured_content.as_ref().map(|v| v.to_string()))
            .unwrap_or_else(|| "MCP tool returned an error result".into());
        warn!(tool = name, %message, "server rejected tool call");
        return tool_failure(name, message);
    }

    match text {
        Ok(text) => ToolOutcome::success(text.unwrap_or_default()),
        Err(message) => {
            warn!(tool = name, %message, "tool result has no text payload");
            tool_failure(name, message)
        }
    }
}

fn tool_failure(name: &str, message: String) -> ToolOutcome {
    ToolOutcome::failure(
        ConduitError::ToolExecution {
            tool_name: name.to_string(),
            message,
        }
        .to_string(),
    )
}

fn should_retry_protocol_fallback(error: &ClientInitializeError) -> bool {
    match error {
        ClientInitializeError::JsonRpcError(error) => {
            let message = error.message.to_ascii_lowercase();
            message.contains("protocol") && message.contains("version")
        }
        _ => false,
    }
}

fn map_client_initialize_error(error: ClientInitializeError) -> ConduitError {
    let message = match error {
        ClientInitializeError::ConnectionClosed(context) => {
            format!("MCP initialize connection closed: {context}")
        }
        ClientInitializeError::TransportError { error, context } => {
            format!("MCP initialize transport error ({context}): {error}")
        }
        ClientInitializeError::JsonRpcError(error) => format!(
            "MCP initialize JSON-RPC error {}: {}",
            error.code.0, error.message
        ),
        ClientInitializeError::Cancelled => "MCP initialize cancelled".to_string(),
        other => format!("MCP initialize error: {other}"),
    };
    ConduitError::Transport(message)
}

fn map_service_error(operation: &str, error: ServiceError) -> ConduitError {
    match error {
        ServiceError::McpError(error) => ConduitError::remote(
            operation,
            format!("MCP error {}: {}", error.code.0, error.message),
        ),
        ServiceError::TransportSend(error) => {
            ConduitError::Transport(format!("{operation}: MCP transport send failed: {error}"))
        }
        ServiceError::TransportClosed => {
            ConduitError::Transport(format!("{operation}: MCP transport closed"))
        }
        ServiceError::UnexpectedResponse => {
            ConduitError::remote(operation, "unexpected MCP response")
        }
        ServiceError::Cancelled { reason } => {
            let suffix = reason
                .as_deref()
                .map(|r| format!(" ({r})"))
                .unwrap_or_default();
            ConduitError::Transport(format!("{operation}: MCP request cancelled{suffix}"))
        }
        ServiceError::Timeout { timeout } => ConduitError::Transport(format!(
            "{operation}: MCP request timed out after {}ms",
            timeout.as_millis()
        )),
        other => ConduitError::remote(operation, format!("MCP service error: {other}")),
    }
}
