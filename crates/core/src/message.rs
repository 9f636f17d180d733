//! Message and Conversation domain types.
//!
//! These are the core value objects that flow through the system:
//! the user asks a question → the agent loop appends it to the
//! conversation → the provider generates a response (possibly with
//! tool calls) → tool results are appended → repeat until an answer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation (session).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions (advisor identity, rules)
    System,
    /// Tool execution result
    Tool,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content (may be empty on assistant messages that only
    /// carry tool calls)
    pub content: String,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<MessageToolCall>,

    /// If this is a tool result, which tool call it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create a tool result message linked to its originating call.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::with_role(Role::Tool, content)
        }
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            timestamp: Utc::now(),
        }
    }
}

/// A tool call embedded in an assistant message.
///
/// `arguments` is the raw JSON string exactly as the model emitted it.
/// It may be malformed; dispatch validates it before use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageToolCall {
    /// Unique ID for this tool call (unique within the turn)
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as JSON string
    pub arguments: String,
}

/// A conversation is an ordered sequence of messages with shared context.
///
/// The transcript is exclusively owned by one session; the agent loop
/// is the only writer for the lifetime of a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: ConversationId,

    /// Ordered messages
    pub messages: Vec<Message>,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// When the last message was added
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a message to the conversation.
    pub fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    /// Trim the conversation to at most `max_messages` entries.
    ///
    /// Removes complete turn groups (a user message plus everything up
    /// to the next user message) from the oldest end. The leading
    /// system message and the most recent turn group are never dropped,
    /// even if that leaves the conversation over the limit.
    ///
    /// Returns the number of messages dropped.
    pub fn trim_to(&mut self, max_messages: usize) -> usize {
        if self.messages.len() <= max_messages {
            return 0;
        }

        let has_system = self
            .messages
            .first()
            .is_some_and(|m| m.role == Role::System);

        let user_indices: Vec<usize> = self
            .messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.role == Role::User)
            .map(|(i, _)| i)
            .collect();

        if user_indices.len() <= 1 {
            // Only one turn group (or none) — nothing safe to drop.
            return 0;
        }

        // Drop the oldest turn groups until we fit, but never the last
        // group (the current question). If even that isn't enough, keep
        // just the system message + last group to bound growth.
        let prefix_len = usize::from(has_system);
        for &cut in user_indices.iter().skip(1) {
            let remaining = prefix_len + (self.messages.len() - cut);
            let last_group_start = *user_indices.last().unwrap_or(&cut);
            if remaining <= max_messages || cut == last_group_start {
                let dropped = cut - prefix_len;
                self.messages.drain(prefix_len..cut);
                tracing::warn!(
                    dropped,
                    limit = max_messages,
                    "Trimmed old messages to stay within history limit"
                );
                return dropped;
            }
        }

        0
    }

    /// Get the total token count estimate (rough: 4 chars ≈ 1 token).
    pub fn estimated_tokens(&self) -> usize {
        self.messages.iter().map(|m| m.content.len() / 4).sum()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(conv: &mut Conversation, question: &str, answer: &str) {
        conv.push(Message::user(question));
        conv.push(Message::assistant(answer));
    }

    #[test]
    fn create_user_message() {
        let msg = Message::user("How do I fix my economy?");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "How do I fix my economy?");
        assert!(msg.tool_calls.is_empty());
    }

    #[test]
    fn tool_result_links_to_call() {
        let msg = Message::tool_result("call_1", "result data");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn conversation_tracks_updates() {
        let mut conv = Conversation::new();
        let created = conv.created_at;

        conv.push(Message::user("First message"));
        assert_eq!(conv.messages.len(), 1);
        assert!(conv.updated_at >= created);
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::user("Test message");
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.content, "Test message");
        assert_eq!(deserialized.role, Role::User);
    }

    #[test]
    fn trim_noop_under_limit() {
        let mut conv = Conversation::new();
        conv.push(Message::system("prompt"));
        turn(&mut conv, "q1", "a1");
        assert_eq!(conv.trim_to(10), 0);
        assert_eq!(conv.messages.len(), 3);
    }

    #[test]
    fn trim_drops_oldest_turn_group() {
        let mut conv = Conversation::new();
        conv.push(Message::system("prompt"));
        turn(&mut conv, "q1", "a1");
        turn(&mut conv, "q2", "a2");
        turn(&mut conv, "q3", "a3");
        // 7 messages, limit 5 → drop the q1 group
        let dropped = conv.trim_to(5);
        assert_eq!(dropped, 2);
        assert_eq!(conv.messages[0].role, Role::System);
        assert_eq!(conv.messages[1].content, "q2");
    }

    #[test]
    fn trim_never_drops_last_turn_group() {
        let mut conv = Conversation::new();
        conv.push(Message::system("prompt"));
        turn(&mut conv, "q1", "a1");
        // Current question with a long tool exchange
        conv.push(Message::user("q2"));
        for i in 0..6 {
            conv.push(Message::tool_result(format!("call_{i}"), "data"));
        }
        // Limit smaller than system + last group: older groups go, the
        // last group stays intact.
        conv.trim_to(4);
        assert_eq!(conv.messages[0].role, Role::System);
        assert_eq!(conv.messages[1].content, "q2");
        assert_eq!(conv.messages.len(), 8);
    }

    #[test]
    fn trim_single_turn_group_untouched() {
        let mut conv = Conversation::new();
        conv.push(Message::system("prompt"));
        conv.push(Message::user("q1"));
        for i in 0..5 {
            conv.push(Message::tool_result(format!("call_{i}"), "data"));
        }
        assert_eq!(conv.trim_to(3), 0);
        assert_eq!(conv.messages.len(), 7);
    }

    #[test]
    fn conversation_token_estimate() {
        let mut conv = Conversation::new();
        // 20 chars ≈ 5 tokens
        conv.push(Message::user("12345678901234567890"));
        assert_eq!(conv.estimated_tokens(), 5);
    }
}
