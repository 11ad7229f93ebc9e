//! Completion request and response types

use crate::{Message, ToolDefinition};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// One chat completion call: the whole conversation plus generation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier, passed through to the provider
    pub model: String,

    /// Conversation so far, oldest first
    pub messages: Vec<Message>,

    /// System prompt, sent ahead of the conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Upper bound on generated tokens
    pub max_tokens: usize,

    /// Sampling temperature; the provider default applies when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Tools offered to the model; `None` when the agent has none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
}

impl CompletionRequest {
    /// Start a request for `model`
    pub fn builder(model: impl Into<String>) -> CompletionRequestBuilder {
        CompletionRequestBuilder {
            request: Self {
                model: model.into(),
                messages: Vec::new(),
                system: None,
                max_tokens: DEFAULT_MAX_TOKENS,
                temperature: None,
                tools: None,
            },
        }
    }
}

const DEFAULT_MAX_TOKENS: usize = 1024;

/// Result of a non-streaming completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Assistant turn, possibly carrying tool-use blocks
    pub message: Message,

    /// Why generation stopped
    pub stop_reason: StopReason,

    /// Tokens billed for this call
    pub usage: TokenUsage,
}

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The model finished its turn
    EndTurn,

    /// `max_tokens` was reached
    MaxTokens,

    /// Output withheld by the provider's content filter
    ContentFilter,

    /// The model wants tool results before continuing
    ToolUse,
}

/// Prompt and completion token counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub input_tokens: usize,

    /// Generated tokens
    pub output_tokens: usize,
}

impl TokenUsage {
    /// Prompt plus completion tokens
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, round: Self) {
        self.input_tokens += round.input_tokens;
        self.output_tokens += round.output_tokens;
    }
}

/// Builder for CompletionRequest
#[derive(Debug, Clone)]
pub struct CompletionRequestBuilder {
    request: CompletionRequest,
}

impl CompletionRequestBuilder {
    /// Replace the conversation
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.request.messages = messages;
        self
    }

    /// Append one message to the conversation
    pub fn message(mut self, message: Message) -> Self {
        self.request.messages.push(message);
        self
    }

    /// Set or clear the system prompt
    pub fn system(mut self, system: Option<String>) -> Self {
        self.request.system = system;
        self
    }

    /// Cap generated tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.request.max_tokens = max_tokens;
        self
    }

    /// Set or clear the sampling temperature
    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.request.temperature = temperature;
        self
    }

    /// Offer tools to the model; an empty list offers none
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.request.tools = (!tools.is_empty()).then_some(tools);
        self
    }

    /// Finish the request
    pub fn build(self) -> CompletionRequest {
        self.request
    }
}
