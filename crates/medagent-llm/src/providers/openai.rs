//! OpenAI-compatible provider implementation
//!
//! This module implements the LLMProvider trait for the OpenAI chat
//! completions protocol. Groq serves the same protocol under
//! [`GROQ_API_BASE`], which is how the medical agents reach their model.
//! See: https://platform.openai.com/docs/api-reference/chat
//!
//! # Examples
//!
//! ## Streaming from Groq
//!
//! ```no_run
//! use futures::StreamExt;
//! use medagent_llm::providers::OpenAIProvider;
//! use medagent_llm::{CompletionRequest, LLMProvider, Message, StreamEvent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAIProvider::groq("gsk_...")?;
//!
//!     let request = CompletionRequest::builder("llama-3.3-70b-versatile")
//!         .message(Message::user("Hello!"))
//!         .max_tokens(100)
//!         .build();
//!
//!     let mut events = provider.stream(request);
//!     while let Some(event) = events.next().await {
//!         if let StreamEvent::TextDelta(text) = event? {
//!             print!("{text}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Other OpenAI-compatible servers
//!
//! ```no_run
//! use medagent_llm::providers::{OpenAIConfig, OpenAIProvider};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let local_config = OpenAIConfig::new("not-needed")
//!     .with_api_base("http://localhost:8000/v1")
//!     .with_timeout(60);
//!
//! let provider = OpenAIProvider::with_config(local_config)?;
//! # Ok(())
//! # }
//! ```

use crate::stream::sse_data;
use crate::{
    CompletionRequest, CompletionResponse, CompletionStream, ContentBlock, LLMError, LLMProvider,
    Message, MessageContent, Result, Role, StopReason, StreamEvent, TokenUsage, ToolDefinition,
};
use async_stream::try_stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::pin::pin;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Base URL of Groq's OpenAI-compatible API
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Configuration for the OpenAI-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API (default: "https://api.openai.com/v1")
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,

    /// Optional list of supported models
    /// If None, any model string is accepted
    pub supported_models: Option<Vec<String>>,

    /// Name reported by [`LLMProvider::name`]
    pub provider_name: String,
}

impl OpenAIConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            supported_models: None,
            provider_name: "openai".to_string(),
        }
    }

    /// Create a config pointing at Groq
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self {
            api_base: GROQ_API_BASE.to_string(),
            provider_name: "groq".to_string(),
            ..Self::new(api_key)
        }
    }

    /// Set custom API base URL
    ///
    /// A trailing slash is ignored.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set supported models list
    ///
    /// When set, the provider will validate model names against this list.
    /// When None (default), any model string is accepted.
    pub fn with_supported_models(mut self, models: Vec<String>) -> Self {
        self.supported_models = Some(models);
        self
    }

    /// Add a single supported model
    pub fn add_supported_model(mut self, model: impl Into<String>) -> Self {
        self.supported_models
            .get_or_insert_with(Vec::new)
            .push(model.into());
        self
    }

    /// Validate model name against supported models list (if configured)
    fn validate_model(&self, model: &str) -> Result<()> {
        if let Some(supported) = &self.supported_models {
            if !supported.iter().any(|m| m == model) {
                return Err(LLMError::InvalidRequest(format!(
                    "Model '{model}' is not in the supported models list: {supported:?}"
                )));
            }
        }
        Ok(())
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

/// OpenAI-compatible provider
///
/// Works with Groq, OpenAI, and any server exposing `/chat/completions`.
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    /// Create a new provider with custom configuration
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LLMError::ConfigurationError(format!(
                "API key for provider '{}' is empty",
                config.provider_name
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new OpenAI provider with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(OpenAIConfig::new(api_key))
    }

    /// Create a provider for Groq with default settings
    pub fn groq(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(OpenAIConfig::groq(api_key))
    }

    /// Get the current configuration
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    #[instrument(skip(self, request), fields(model = %request.model, api_base = %self.config.api_base))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending completion request");
        self.config.validate_model(&request.model)?;

        let model = request.model.clone();
        let body = OpenAIRequest::from_request(request, false);
        let response = self
            .client
            .post(self.config.chat_completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let response = error_for_status(response, &model).await?;

        let openai_response: OpenAIResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        // OpenAI can return multiple choices but we only ask for one
        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::UnexpectedResponse("No choices in response".to_string()))?;

        let usage = openai_response.usage.map(TokenUsage::from).unwrap_or_default();
        debug!(
            finish_reason = %choice.finish_reason,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Received completion"
        );

        Ok(CompletionResponse {
            message: parse_openai_response(choice.message)?,
            stop_reason: map_stop_reason(&choice.finish_reason),
            usage,
        })
    }

    fn stream(&self, request: CompletionRequest) -> CompletionStream {
        Box::pin(sse_events(self.client.clone(), self.config.clone(), request))
    }

    fn name(&self) -> &str {
        &self.config.provider_name
    }
}

/// Issue a streaming request and translate its chunks into [`StreamEvent`]s
fn sse_events(
    client: Client,
    config: OpenAIConfig,
    request: CompletionRequest,
) -> impl Stream<Item = Result<StreamEvent>> + Send {
    try_stream! {
        config.validate_model(&request.model)?;

        let model = request.model.clone();
        debug!(model = %model, api_base = %config.api_base, "Sending streaming request");
        let body = OpenAIRequest::from_request(request, true);
        let response = client
            .post(config.chat_completions_url())
            .bearer_auth(&config.api_key)
            .json(&body)
            .send()
            .await?;
        let response = error_for_status(response, &model).await?;

        let mut payloads = pin!(sse_data(response.bytes_stream()));
        let mut tool_calls = ToolCallAccumulator::default();
        let mut finish_reason: Option<String> = None;
        let mut usage = TokenUsage::default();
        let mut saw_done = false;

        while let Some(data) = payloads.next().await {
            let data = data?;
            if data == "[DONE]" {
                saw_done = true;
                break;
            }
            if data.trim().is_empty() {
                continue;
            }

            let chunk: OpenAIStreamChunk = serde_json::from_str(&data).map_err(|e| {
                LLMError::UnexpectedResponse(format!("Failed to parse stream chunk: {e}"))
            })?;
            let chunk = chunk.into_result()?;

            if let Some(reported) = chunk.reported_usage() {
                usage = reported;
            }

            for choice in chunk.choices {
                for fragment in choice.delta.tool_calls {
                    tool_calls.push(fragment);
                }
                if let Some(content) = choice.delta.content {
                    if !content.is_empty() {
                        yield StreamEvent::TextDelta(content);
                    }
                }
                if let Some(reason) = choice.finish_reason {
                    finish_reason = Some(reason);
                }
            }
        }

        let stop_reason = final_stop_reason(finish_reason.as_deref(), saw_done)?;
        for block in tool_calls.finish()? {
            if let ContentBlock::ToolUse { id, name, input } = block {
                yield StreamEvent::ToolUse { id, name, input };
            }
        }
        debug!(
            stop_reason = ?stop_reason,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Stream finished"
        );
        yield StreamEvent::Finished { stop_reason, usage };
    }
}

/// Stop reason of a finished stream
///
/// A body that ends with neither `[DONE]` nor a finish reason was cut off.
fn final_stop_reason(finish_reason: Option<&str>, saw_done: bool) -> Result<StopReason> {
    match (finish_reason, saw_done) {
        (Some(reason), _) => Ok(map_stop_reason(reason)),
        (None, true) => {
            debug!("Stream finished without a finish reason");
            Ok(StopReason::EndTurn)
        }
        (None, false) => {
            warn!("Stream ended before the completion finished");
            Err(LLMError::UnexpectedResponse(
                "stream ended without [DONE] or a finish reason".to_string(),
            ))
        }
    }
}

/// Pass successful responses through, turn the rest into [`LLMError`]s
async fn error_for_status(response: Response, model: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), model, "Provider rejected request");
    Err(LLMError::from_status(status.as_u16(), body, model))
}

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAITool>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

impl OpenAIRequest {
    fn from_request(request: CompletionRequest, stream: bool) -> Self {
        Self {
            messages: build_openai_messages(request.system, request.messages),
            tools: request.tools.as_deref().map(convert_tools),
            model: request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream,
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAIToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl OpenAIMessage {
    fn text(role: &'static str, content: String) -> Self {
        Self {
            role,
            content: Some(content),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAITool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: OpenAIFunction,
}

#[derive(Debug, Serialize)]
struct OpenAIFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct OpenAIToolCall {
    id: String,
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: OpenAIFunctionCall,
}

#[derive(Debug, Serialize)]
struct OpenAIFunctionCall {
    name: String,
    arguments: String,
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseToolCall {
    id: String,
    function: OpenAIResponseFunctionCall,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

impl From<OpenAIUsage> for TokenUsage {
    fn from(usage: OpenAIUsage) -> Self {
        Self {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        }
    }
}

// ============================================================================
// Streaming chunk types
// ============================================================================

#[derive(Debug, Deserialize)]
struct OpenAIStreamChunk {
    #[serde(default)]
    choices: Vec<OpenAIStreamChoice>,
    usage: Option<OpenAIUsage>,
    /// Groq reports usage on the last chunk under this extension
    x_groq: Option<GroqExtension>,
    /// Failure reported after the 200 response had already started
    error: Option<OpenAIStreamError>,
}

impl OpenAIStreamChunk {
    fn into_result(self) -> Result<Self> {
        match self.error {
            Some(error) => {
                warn!(message = %error.message, "Provider reported an error mid-stream");
                Err(error.into())
            }
            None => Ok(self),
        }
    }

    fn reported_usage(&self) -> Option<TokenUsage> {
        self.usage
            .or_else(|| self.x_groq.as_ref().and_then(|x| x.usage))
            .map(TokenUsage::from)
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIStreamError {
    #[serde(default)]
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<serde_json::Value>,
}

impl From<OpenAIStreamError> for LLMError {
    fn from(error: OpenAIStreamError) -> Self {
        let code = error.code.as_ref().and_then(serde_json::Value::as_str);
        let rate_limited = code == Some("rate_limit_exceeded")
            || error.error_type.as_deref() == Some("rate_limit_exceeded")
            || error.message.to_lowercase().contains("rate limit");
        if rate_limited {
            Self::RateLimitExceeded(error.message)
        } else {
            Self::RequestFailed(error.message)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GroqExtension {
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIStreamChoice {
    #[serde(default)]
    delta: OpenAIDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAIDelta {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<OpenAIToolCallDelta>,
}

#[derive(Debug, Deserialize)]
struct OpenAIToolCallDelta {
    index: usize,
    id: Option<String>,
    function: Option<OpenAIFunctionDelta>,
}

#[derive(Debug, Deserialize)]
struct OpenAIFunctionDelta {
    name: Option<String>,
    arguments: Option<String>,
}

/// Merges streamed tool-call fragments, keyed by their index
#[derive(Debug, Default)]
struct ToolCallAccumulator {
    calls: BTreeMap<usize, PartialToolCall>,
}

#[derive(Debug, Default)]
struct PartialToolCall {
    id: String,
    name: String,
    arguments: String,
}

impl ToolCallAccumulator {
    fn push(&mut self, fragment: OpenAIToolCallDelta) {
        let call = self.calls.entry(fragment.index).or_default();
        if let Some(id) = fragment.id {
            call.id.push_str(&id);
        }
        if let Some(function) = fragment.function {
            if let Some(name) = function.name {
                call.name.push_str(&name);
            }
            if let Some(arguments) = function.arguments {
                call.arguments.push_str(&arguments);
            }
        }
    }

    /// Complete tool calls in index order
    fn finish(self) -> Result<Vec<ContentBlock>> {
        self.calls
            .into_values()
            .map(|call| {
                Ok(ContentBlock::ToolUse {
                    input: parse_arguments(&call.arguments)?,
                    id: call.id,
                    name: call.name,
                })
            })
            .collect()
    }
}

// ============================================================================
// Conversion functions
// ============================================================================

/// Build OpenAI messages from our generic format
///
/// The system prompt goes first in the messages array.
fn build_openai_messages(system: Option<String>, messages: Vec<Message>) -> Vec<OpenAIMessage> {
    let mut result = Vec::with_capacity(messages.len() + 1);
    if let Some(sys) = system {
        result.push(OpenAIMessage::text("system", sys));
    }
    for msg in messages {
        result.extend(convert_message(msg));
    }
    result
}

/// Convert a single message to OpenAI format
///
/// Tool results become separate `tool` messages, so one message may expand
/// into several.
fn convert_message(msg: Message) -> Vec<OpenAIMessage> {
    let role = match msg.role {
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::System => "system",
    };

    match msg.content {
        MessageContent::Text(text) => vec![OpenAIMessage::text(role, text)],
        MessageContent::Blocks(blocks) => convert_blocks(role, blocks),
    }
}

fn convert_blocks(role: &'static str, blocks: Vec<ContentBlock>) -> Vec<OpenAIMessage> {
    let mut messages = Vec::new();
    let mut text = Vec::new();
    let mut tool_calls = Vec::new();

    for block in blocks {
        match block {
            ContentBlock::Text { text: part } => text.push(part),
            ContentBlock::ToolUse { id, name, input } => tool_calls.push(OpenAIToolCall {
                id,
                tool_type: "function",
                function: OpenAIFunctionCall {
                    name,
                    arguments: input.to_string(),
                },
            }),
            ContentBlock::ToolResult {
                tool_use_id,
                content,
                ..
            } => messages.push(OpenAIMessage {
                role: "tool",
                content: Some(content),
                tool_calls: None,
                tool_call_id: Some(tool_use_id),
            }),
        }
    }

    if !text.is_empty() || !tool_calls.is_empty() {
        messages.insert(
            0,
            OpenAIMessage {
                role,
                content: (!text.is_empty()).then(|| text.join("\n")),
                tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
                tool_call_id: None,
            },
        );
    }

    messages
}

fn convert_tools(tools: &[ToolDefinition]) -> Vec<OpenAITool> {
    tools
        .iter()
        .map(|tool| OpenAITool {
            tool_type: "function",
            function: OpenAIFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.input_schema.clone(),
            },
        })
        .collect()
}

/// Tool arguments arrive as a JSON string; an empty string means no arguments
fn parse_arguments(arguments: &str) -> Result<serde_json::Value> {
    if arguments.trim().is_empty() {
        return Ok(serde_json::json!({}));
    }
    serde_json::from_str(arguments)
        .map_err(|e| LLMError::UnexpectedResponse(format!("Failed to parse tool arguments: {e}")))
}

fn parse_openai_response(msg: OpenAIResponseMessage) -> Result<Message> {
    let mut tool_uses = Vec::new();
    for call in msg.tool_calls.unwrap_or_default() {
        tool_uses.push(ContentBlock::ToolUse {
            input: parse_arguments(&call.function.arguments)?,
            id: call.id,
            name: call.function.name,
        });
    }
    Ok(Message::assistant_blocks(
        msg.content.unwrap_or_default(),
        tool_uses,
    ))
}

fn map_stop_reason(reason: &str) -> StopReason {
    match reason {
        "stop" => StopReason::EndTurn,
        "length" => StopReason::MaxTokens,
        "tool_calls" | "function_call" => StopReason::ToolUse,
        "content_filter" => StopReason::ContentFilter,
        _ => {
            debug!("Unknown stop reason: {}", reason);
            StopReason::EndTurn
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
