//! Client side of the tool provider connection.
//!
//! The provider is an MCP server launched as a child process and reached over
//! its stdin/stdout. [`McpServer`] is the seam the chat session talks to, so
//! tests can swap in an in-memory server.

use async_trait::async_trait;
use rmcp::model::{CallToolRequestParam, ErrorCode, RawContent};
use rmcp::service::{RoleClient, RunningService, ServiceError};
use rmcp::transport::TokioChildProcess;
use rmcp::{ClientHandler, ServiceExt};
use serde_json::{Map, Value};
use std::ops::Deref;
use std::path::Path;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::tools::{ToolDescriptor, ToolError};

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("failed to launch tool provider '{path}': {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("tool provider '{path}' did not complete the MCP handshake: {reason}")]
    Handshake { path: String, reason: String },
}

/// Trait for tool providers the chat session can call.
#[async_trait]
pub trait McpServer: Send + Sync {
    /// List the provider's tools.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolError>;

    /// Execute a tool and return its text output.
    async fn call_tool(&self, name: &str, args: Map<String, Value>) -> Result<String, ToolError>;
}

#[async_trait]
impl<S: ClientHandler + Send + Sync> McpServer for RunningService<RoleClient, S> {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolError> {
        let result = self
            .deref()
            .list_tools(None)
            .await
            .map_err(classify_service_error)?;
        Ok(result.tools.into_iter().map(ToolDescriptor::from).collect())
    }

    async fn call_tool(&self, name: &str, args: Map<String, Value>) -> Result<String, ToolError> {
        let params = CallToolRequestParam {
            name: name.to_string().into(),
            arguments: Some(args),
        };

        let result = self
            .deref()
            .call_tool(params)
            .await
            .map_err(classify_service_error)?;

        let mut text = Vec::new();
        for content in result.content {
            if let RawContent::Text(text_content) = content.raw {
                text.push(text_content.text);
            }
        }
        if text.is_empty() {
            if let Some(structured) = result.structured_content {
                text.push(structured.to_string());
            }
        }
        let text = text.join("\n");

        if result.is_error.unwrap_or(false) {
            return Err(ToolError::UpstreamUnavailable(text));
        }
        Ok(text)
    }
}

/// Map an rmcp service error onto the tool error kinds.
///
/// JSON-RPC parameter errors are the provider rejecting the call; a closed or
/// broken transport means the provider process is gone.
pub fn classify_service_error(error: ServiceError) -> ToolError {
    match error {
        ServiceError::McpError(data)
            if data.code == ErrorCode::INVALID_PARAMS || data.code == ErrorCode::METHOD_NOT_FOUND =>
        {
            ToolError::InvalidArgument(data.message.to_string())
        }
        ServiceError::McpError(data) => ToolError::UpstreamUnavailable(data.message.to_string()),
        other => ToolError::ConnectionLost(other.to_string()),
    }
}

/// Build the command that runs the provider at `path`.
///
/// Python and JavaScript entry points run through their interpreter; anything
/// else is executed directly.
pub fn provider_command(path: &Path) -> Command {
    let interpreter = match path.extension().and_then(|ext| ext.to_str()) {
        Some("py") => Some("python"),
        Some("js") => Some("node"),
        _ => None,
    };

    let mut command = match interpreter {
        Some(program) => {
            let mut command = Command::new(program);
            command.arg(path);
            command
        }
        None => Command::new(path),
    };
    command.kill_on_drop(true);
    command
}

/// Launch the provider and complete the MCP handshake over its stdio.
pub async fn connect_stdio(path: &Path) -> Result<RunningService<RoleClient, ()>, ConnectError> {
    let shown = path.display().to_string();
    debug!("Launching tool provider: {}", shown);

    let transport = TokioChildProcess::new(provider_command(path)).map_err(|source| {
        ConnectError::Spawn {
            path: shown.clone(),
            source,
        }
    })?;

    let service = ().serve(transport).await.map_err(|e| ConnectError::Handshake {
        path: shown.clone(),
        reason: e.to_string(),
    })?;

    if let Some(info) = service.peer_info() {
        info!(
            "Connected to tool provider {} {}",
            info.server_info.name, info.server_info.version
        );
    }

    Ok(service)
}
