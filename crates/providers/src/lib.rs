//! LLM provider implementations for Strategos.
//!
//! One provider covers the field: any endpoint speaking the OpenAI
//! `/v1/chat/completions` dialect (OpenAI, OpenRouter, local servers).

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
