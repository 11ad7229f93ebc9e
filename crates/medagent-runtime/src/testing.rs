//! Test doubles shared by the runtime tests

use async_trait::async_trait;
use futures::stream;
use medagent_core::Result as AgentResult;
use medagent_llm::{
    CompletionRequest, CompletionResponse, CompletionStream, LLMError, LLMProvider, StopReason,
    StreamEvent, TokenUsage,
};
use medagent_tools::Tool;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Provider that replays one scripted event list per streamed request
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    rounds: Mutex<VecDeque<Vec<StreamEvent>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub(crate) fn new(rounds: Vec<Vec<StreamEvent>>) -> Self {
        Self {
            rounds: Mutex::new(rounds.into()),
            requests: Mutex::default(),
        }
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, _request: CompletionRequest) -> medagent_llm::Result<CompletionResponse> {
        Err(LLMError::RequestFailed("not scripted".to_string()))
    }

    fn stream(&self, request: CompletionRequest) -> CompletionStream {
        self.requests.lock().unwrap().push(request);
        match self.rounds.lock().unwrap().pop_front() {
            Some(events) => Box::pin(stream::iter(events.into_iter().map(Ok))),
            None => Box::pin(stream::iter([Err(LLMError::RequestFailed(
                "script exhausted".to_string(),
            ))])),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub(crate) fn text(delta: &str) -> StreamEvent {
    StreamEvent::TextDelta(delta.to_string())
}

pub(crate) fn tool_use(id: &str, name: &str, input: Value) -> StreamEvent {
    StreamEvent::ToolUse {
        id: id.to_string(),
        name: name.to_string(),
        input,
    }
}

pub(crate) fn finished(stop_reason: StopReason) -> StreamEvent {
    StreamEvent::Finished {
        stop_reason,
        usage: TokenUsage {
            input_tokens: 10,
            output_tokens: 5,
        },
    }
}

/// Tool that echoes its `query` argument, or fails when asked to
pub(crate) struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        match params["query"].as_str() {
            Some("fail") => Err(medagent_core::Error::tool("echo", "service unavailable")),
            Some(query) => Ok(json!({ "echo": query })),
            None => Ok(Value::String("no query".to_string())),
        }
    }

    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echo the query"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {"query": {"type": "string"}}})
    }
}
