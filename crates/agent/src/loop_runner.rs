//! The advisor reasoning loop implementation.

use std::sync::Arc;

use strategos_core::message::{Conversation, Message, Role};
use strategos_core::provider::{ModelCapabilities, Provider, ProviderRequest};
use strategos_core::tool::ToolRegistry;
use tracing::{debug, info, warn};

use crate::complexity::{is_complex_query, planning_instruction};
use crate::prompts::SYSTEM_PROMPT;

/// What a user turn produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model produced a final text answer.
    Answer(String),

    /// The iteration budget ran out before the model settled on an
    /// answer. The reason is user-facing and actionable.
    Aborted { reason: String },
}

/// The core agent loop that orchestrates LLM calls and tool execution.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Request quirks for the model, resolved once at construction
    capabilities: ModelCapabilities,

    /// Temperature setting (ignored for models that reject it)
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// Tool registry
    tools: Arc<ToolRegistry>,

    /// System prompt establishing the advisor identity
    system_prompt: String,

    /// Maximum tool call iterations per turn
    max_iterations: u32,

    /// History cap before old turn groups are trimmed
    max_history_messages: usize,
}

impl AgentLoop {
    /// Create a new agent loop.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, tools: Arc<ToolRegistry>) -> Self {
        let model = model.into();
        Self {
            capabilities: ModelCapabilities::for_model(&model),
            provider,
            model,
            temperature: 0.7,
            max_tokens: None,
            tools,
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_iterations: 10,
            max_history_messages: 40,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set the maximum number of tool call iterations.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the history cap in messages.
    pub fn with_max_history(mut self, max: usize) -> Self {
        self.max_history_messages = max;
        self
    }

    /// Replace the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Process a user message and produce an outcome.
    ///
    /// This is the main entry point for the agent loop. It:
    /// 1. Ensures the system prompt leads the conversation
    /// 2. Calls the LLM (with a planning instruction for complex queries)
    /// 3. If tool calls are returned, executes them in order and loops
    /// 4. Returns the final text answer, or aborts at the iteration cap
    pub async fn process(
        &self,
        conversation: &mut Conversation,
        user_message: &str,
    ) -> strategos_core::Result<TurnOutcome> {
        info!(
            conversation_id = %conversation.id,
            messages = conversation.messages.len(),
            "Processing user turn"
        );

        // Ensure system prompt is the first message
        if conversation.messages.is_empty() || conversation.messages[0].role != Role::System {
            conversation
                .messages
                .insert(0, Message::system(&self.system_prompt));
        }

        let complex = is_complex_query(user_message);
        conversation.push(Message::user(user_message));

        let tool_definitions = self.tools.definitions();
        let mut iteration = 0;

        while iteration < self.max_iterations {
            iteration += 1;

            // Trim history before each API call to stay within limits.
            conversation.trim_to(self.max_history_messages);

            debug!(
                conversation_id = %conversation.id,
                iteration,
                "Agent loop iteration"
            );

            // The planning instruction is injected per request, right
            // after the system prompt; it never enters the stored
            // history.
            let mut request_messages = conversation.messages.clone();
            if complex {
                request_messages.insert(1, Message::system(planning_instruction()));
            }

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: request_messages,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
                capabilities: self.capabilities,
            };

            let response = self.provider.complete(request).await?;

            let tool_calls = response.message.tool_calls.clone();
            let content = response.message.content.clone();
            conversation.push(response.message);

            if tool_calls.is_empty() {
                if content.is_empty() {
                    // No tool calls and no text: let the model try again.
                    continue;
                }
                return Ok(TurnOutcome::Answer(content));
            }

            debug!(tool_count = tool_calls.len(), "Executing tool calls");

            // Execute the calls one at a time, in the order the model
            // emitted them, feeding each result back as a tool message.
            for tc in &tool_calls {
                let result = self.tools.dispatch(tc).await;
                debug!(
                    tool = %tc.name,
                    success = result.success,
                    "Tool call completed"
                );
                conversation.push(Message::tool_result(&tc.id, &result.output));
            }
        }

        warn!(
            conversation_id = %conversation.id,
            iterations = iteration,
            "Iteration budget exhausted without a final answer"
        );

        Ok(TurnOutcome::Aborted {
            reason: "I've reached the maximum number of research steps for this query. \
                     This usually happens with very complex questions. \
                     Try asking a more specific question, or break it into smaller parts."
                .into(),
        })
    }
}
