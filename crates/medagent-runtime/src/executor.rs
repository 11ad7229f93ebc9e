//! Agent executor for running agent loops
//!
//! The AgentExecutor implements the core agent loop pattern:
//! 1. Stream a completion with the conversation history and available tools
//! 2. Forward text deltas as they arrive
//! 3. If tool calls were requested, execute them in order and loop back
//! 4. Otherwise finish with a [`AgentEvent::Completed`] summary

use async_stream::try_stream;
use futures::{Stream, StreamExt};
use medagent_core::{AgentEvent, Error, EventStream, Result};
use medagent_llm::{
    CompletionRequest, ContentBlock, LLMProvider, Message, StopReason, StreamEvent, TokenUsage,
    ToolDefinition,
};
use medagent_tools::ToolRegistry;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Text appended to the response when the loop is cut short
pub const ITERATION_LIMIT_NOTICE: &str =
    "\n\n[Stopped: reached the maximum number of reasoning steps before a final answer.]";

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of LLM rounds (prevents infinite loops)
    pub max_iterations: usize,

    /// Model to use
    pub model: String,

    /// System prompt
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,

    /// Emit tool call events in the response stream
    pub show_tool_calls: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            model: "llama-3.3-70b-versatile".to_string(),
            system_prompt: None,
            max_tokens: 4096,
            temperature: None,
            show_tool_calls: false,
        }
    }
}

/// Executes an agent loop: LLM → tool calls → execution → loop back
///
/// The tool registry holds exactly the tools this agent may call, delegate
/// tools included.
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tool_registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            config,
        }
    }

    /// Execution settings
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Tools available to this agent
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// Run the loop for one user message, streaming events as they happen
    pub fn stream(&self, user_message: String) -> EventStream<'_> {
        Box::pin(run_loop(self, user_message))
    }

    fn build_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tool_registry
            .list_tools()
            .iter()
            .map(|tool| tool.definition())
            .collect()
    }

    fn build_request(&self, conversation: &[Message], tools: &[ToolDefinition]) -> CompletionRequest {
        CompletionRequest::builder(&self.config.model)
            .messages(conversation.to_vec())
            .system(self.config.system_prompt.clone())
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .tools(tools.to_vec())
            .build()
    }

    /// Execute one tool call, turning failures into error results
    async fn execute_tool(&self, name: &str, input: Value) -> std::result::Result<String, String> {
        let Some(tool) = self.tool_registry.get(name) else {
            return Err(Error::tool(name, "not available to this agent").to_string());
        };
        match tool.execute(input).await {
            Ok(Value::String(text)) => Ok(text),
            Ok(value) => Ok(value.to_string()),
            Err(e) => Err(e.to_string()),
        }
    }
}

fn run_loop(
    executor: &AgentExecutor,
    user_message: String,
) -> impl Stream<Item = Result<AgentEvent>> + Send + '_ {
    try_stream! {
        let config = &executor.config;
        let tools = executor.build_tool_definitions();
        let mut conversation = vec![Message::user(user_message)];
        let mut usage = TokenUsage::default();
        let mut iteration = 0;

        loop {
            if iteration == config.max_iterations {
                warn!(
                    max_iterations = config.max_iterations,
                    "Max iterations reached, stopping"
                );
                yield AgentEvent::TextDelta(ITERATION_LIMIT_NOTICE.to_string());
                break;
            }
            iteration += 1;

            info!(
                iteration,
                max_iterations = config.max_iterations,
                model = %config.model,
                tool_count = tools.len(),
                "Agent iteration started"
            );

            let request = executor.build_request(&conversation, &tools);
            let mut events = executor.provider.stream(request);

            let mut text = String::new();
            let mut tool_uses = Vec::new();
            let mut stop_reason = StopReason::EndTurn;

            while let Some(event) = events.next().await {
                match event.map_err(Error::from)? {
                    StreamEvent::TextDelta(delta) => {
                        text.push_str(&delta);
                        yield AgentEvent::TextDelta(delta);
                    }
                    StreamEvent::ToolUse { id, name, input } => {
                        tool_uses.push(ContentBlock::ToolUse { id, name, input });
                    }
                    StreamEvent::Finished { stop_reason: reason, usage: round } => {
                        stop_reason = reason;
                        usage += round;
                    }
                }
            }

            info!(
                iteration,
                stop_reason = ?stop_reason,
                response_length = text.len(),
                tool_calls = tool_uses.len(),
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "LLM round finished"
            );

            if tool_uses.is_empty() {
                match stop_reason {
                    StopReason::MaxTokens => warn!("Hit max tokens in LLM response"),
                    StopReason::ContentFilter => warn!("Response withheld by content filter"),
                    StopReason::EndTurn | StopReason::ToolUse => {}
                }
                conversation.push(Message::assistant(text));
                break;
            }

            conversation.push(Message::assistant_blocks(text, tool_uses.clone()));

            for block in tool_uses {
                let ContentBlock::ToolUse { id, name, input } = block else {
                    continue;
                };

                if config.show_tool_calls {
                    yield AgentEvent::ToolCallStarted {
                        id: id.clone(),
                        name: name.clone(),
                        arguments: input.clone(),
                    };
                }

                let input_preview: String = input.to_string().chars().take(500).collect();
                info!(tool_name = %name, tool_id = %id, input_preview = %input_preview, "Executing tool");

                let start_time = Instant::now();
                let outcome = executor.execute_tool(&name, input).await;
                let duration_ms = start_time.elapsed().as_millis() as u64;

                let error = match outcome {
                    Ok(result) => {
                        debug!(tool_name = %name, duration_ms, result_length = result.len(), "Tool execution succeeded");
                        conversation.push(Message::tool_result(id.clone(), result));
                        None
                    }
                    Err(message) => {
                        warn!(tool_name = %name, duration_ms, error = %message, "Tool execution failed");
                        conversation.push(Message::tool_error(id.clone(), format!("Error: {message}")));
                        Some(message)
                    }
                };

                if config.show_tool_calls {
                    yield AgentEvent::ToolCallCompleted { id, name, duration_ms, error };
                }
            }
        }

        debug!(messages = conversation.len(), "Agent loop finished");
        yield AgentEvent::Completed {
            iterations: iteration,
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
        };
    }
}
