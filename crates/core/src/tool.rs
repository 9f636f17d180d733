//! Tool trait — the abstraction over the agent's capabilities.
//!
//! Tools are what let the model look things up: query the local
//! knowledge base or fall back to web search. The model selects a tool
//! by name at runtime; the registry maps that name to a handler from a
//! closed set of known implementations.

use crate::error::ToolError;
use crate::message::MessageToolCall;
use crate::provider::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The result of a tool execution, fed back to the model as a
/// tool-role message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content (or a human-readable error message)
    pub output: String,
}

impl ToolResult {
    /// A successful result.
    pub fn ok(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            success: true,
            output: output.into(),
        }
    }

    /// An error-flagged result. The message is fed back into the
    /// transcript so the model can adapt.
    pub fn error(call_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            success: false,
            output: format!("Error: {}", message.into()),
        }
    }
}

/// The core Tool trait.
///
/// Each tool implements this trait and is registered in the
/// ToolRegistry. Handlers validate their own arguments and return
/// `ToolError::InvalidArguments` on schema violations; the registry
/// turns those into error-flagged results.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "query_knowledge").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools.
///
/// The agent loop uses this to:
/// 1. Get tool definitions to send to the LLM
/// 2. Dispatch tool calls when the LLM requests them
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for sending to the LLM).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Dispatch a tool call exactly as the model emitted it.
    ///
    /// This boundary is infallible: an unknown tool name, argument
    /// JSON that fails to parse, or a handler rejecting the arguments
    /// all degrade to an error-flagged `ToolResult` that goes back
    /// into the transcript. Nothing here aborts the session.
    pub async fn dispatch(&self, call: &MessageToolCall) -> ToolResult {
        let Some(tool) = self.tools.get(&call.name) else {
            return ToolResult::error(&call.id, format!("unknown tool '{}'", call.name));
        };

        let arguments: serde_json::Value = match serde_json::from_str(&call.arguments) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Malformed tool arguments");
                return ToolResult::error(
                    &call.id,
                    format!("invalid tool arguments (JSON decode failed: {e})"),
                );
            }
        };

        match tool.execute(arguments).await {
            Ok(mut result) => {
                result.call_id = call.id.clone();
                result
            }
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool execution failed");
                ToolResult::error(&call.id, e.to_string())
            }
        }
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
