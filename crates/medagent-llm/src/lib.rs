//! LLM provider abstraction layer for medagent
//!
//! This crate provides provider-agnostic abstractions for interacting with
//! Large Language Models (LLMs). It includes:
//!
//! - Message types for LLM communication
//! - Completion request/response types
//! - Streaming events and server-sent events payload extraction
//! - Tool definitions for function calling
//! - Provider trait for LLM implementations
//! - An OpenAI-compatible provider (used for Groq)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;
pub mod stream;
pub mod tools;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role};
pub use provider::{CompletionStream, LLMProvider};
pub use stream::StreamEvent;
pub use tools::ToolDefinition;
