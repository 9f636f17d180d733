//! Provider trait — the abstraction over LLM backends.
//!
//! A Provider knows how to send a conversation to an LLM and get a
//! complete response back. The agent loop calls `complete()` without
//! knowing which backend is being used.
//!
//! Implementations: OpenAI-compatible endpoints (OpenAI, OpenRouter,
//! local servers), plus test doubles.

use crate::error::ProviderError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which request parameter a model accepts for its output token limit.
///
/// Newer OpenAI model families renamed `max_tokens` to
/// `max_completion_tokens` and reject the old name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenLimitParam {
    MaxTokens,
    MaxCompletionTokens,
}

impl TokenLimitParam {
    /// The wire name of this parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaxTokens => "max_tokens",
            Self::MaxCompletionTokens => "max_completion_tokens",
        }
    }
}

/// Per-model request quirks, resolved once when a session is built
/// rather than branched on at each call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    /// Whether the model accepts a sampling temperature.
    pub supports_temperature: bool,

    /// Which parameter name carries the output token limit.
    pub token_limit_param: TokenLimitParam,
}

impl ModelCapabilities {
    /// Resolve capabilities from a model identifier.
    ///
    /// The gpt-5 family rejects `temperature` (only the default is
    /// allowed) and requires `max_completion_tokens`.
    pub fn for_model(model: &str) -> Self {
        if model.contains("gpt-5") {
            Self {
                supports_temperature: false,
                token_limit_param: TokenLimitParam::MaxCompletionTokens,
            }
        } else {
            Self::default()
        }
    }
}

impl Default for ModelCapabilities {
    fn default() -> Self {
        Self {
            supports_temperature: true,
            token_limit_param: TokenLimitParam::MaxTokens,
        }
    }
}

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gpt-4o", "gpt-5-mini")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Temperature (ignored when the model doesn't support it)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Available tools the model can call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,

    /// Request quirks for the target model
    #[serde(default = "ModelCapabilities::default")]
    pub capabilities: ModelCapabilities,
}

fn default_temperature() -> f32 {
    0.7
}

/// A tool definition sent to the LLM so it knows what tools it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated message (text, tool calls, or both)
    pub message: Message,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// One opaque network call per invocation; retry policy belongs to the
/// caller. Implementations must enforce a request timeout.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capabilities() {
        let caps = ModelCapabilities::for_model("gpt-4o");
        assert!(caps.supports_temperature);
        assert_eq!(caps.token_limit_param, TokenLimitParam::MaxTokens);
    }

    #[test]
    fn gpt5_family_capabilities() {
        let caps = ModelCapabilities::for_model("gpt-5-mini");
        assert!(!caps.supports_temperature);
        assert_eq!(
            caps.token_limit_param,
            TokenLimitParam::MaxCompletionTokens
        );
        assert_eq!(caps.token_limit_param.as_str(), "max_completion_tokens");
    }

    #[test]
    fn provider_request_defaults() {
        let req = ProviderRequest {
            model: "gpt-4o".into(),
            messages: vec![],
            temperature: default_temperature(),
            max_tokens: None,
            tools: vec![],
            capabilities: ModelCapabilities::default(),
        };
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn tool_definition_serialization() {
        let tool = ToolDefinition {
            name: "query_knowledge".into(),
            description: "Query the strategy knowledge base".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "category": { "type": "string", "enum": ["mechanics"] }
                },
                "required": ["category"]
            }),
        };
        let json = serde_json::to_string(&tool).unwrap();
        assert!(json.contains("query_knowledge"));
        assert!(json.contains("mechanics"));
    }
}
