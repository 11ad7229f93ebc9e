//! Concrete LLM provider implementations
//!
//! Groq exposes the OpenAI chat-completions protocol, so a single
//! OpenAI-compatible provider serves both.

pub mod openai;

pub use openai::{GROQ_API_BASE, OpenAIConfig, OpenAIProvider};
