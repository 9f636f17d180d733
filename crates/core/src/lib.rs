//! Core types and traits for Strategos — an LLM strategy advisor for
//! grand-strategy campaigns.
//!
//! This crate has zero framework dependencies and defines the
//! fundamental abstractions:
//! - [`Message`] / [`Conversation`] — chat transcript types
//! - [`Provider`] — the LLM backend trait
//! - [`Tool`] / [`ToolRegistry`] — the tool-calling surface
//! - [`SearchBackend`] — web-search fallback
//! - [`LruCache`] — read-through cache for knowledge and search
//! - [`Error`] — the error hierarchy

pub mod cache;
pub mod error;
pub mod message;
pub mod provider;
pub mod search;
pub mod tool;

pub use cache::{CacheStats, LruCache};
pub use error::{Error, KnowledgeError, ProviderError, Result, SearchError, ToolError};
pub use message::{Conversation, ConversationId, Message, MessageToolCall, Role};
pub use provider::{
    ModelCapabilities, Provider, ProviderRequest, ProviderResponse, TokenLimitParam,
    ToolDefinition, Usage,
};
pub use search::{SearchBackend, SearchHit, SearchOutcome};
pub use tool::{Tool, ToolRegistry, ToolResult};
