//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result, StreamEvent};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Incremental completion output from a provider
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// Trait for LLM providers
///
/// Implementations of this trait provide access to different LLM services
/// (e.g., Groq, OpenAI, local OpenAI-compatible servers).
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the LLM
    ///
    /// # Arguments
    ///
    /// * `request` - The completion request with messages, tools, and parameters
    ///
    /// # Returns
    ///
    /// The completion response with the assistant's message and metadata
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Generate a completion as a stream of events
    ///
    /// Text arrives as [`StreamEvent::TextDelta`] in generation order. Tool
    /// calls are reported whole, after the text, and the stream always ends
    /// with [`StreamEvent::Finished`] unless it fails first.
    fn stream(&self, request: CompletionRequest) -> CompletionStream;

    /// Get the provider name (e.g., "groq", "openai")
    fn name(&self) -> &str;
}
