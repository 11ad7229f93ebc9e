//! Events emitted while an agent produces a response

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single event in an agent's response stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum AgentEvent {
    /// A fragment of response text, in generation order
    TextDelta(String),

    /// The agent started a tool call
    ToolCallStarted {
        /// Tool call ID assigned by the model
        id: String,
        /// Tool name
        name: String,
        /// Arguments as requested by the model
        arguments: Value,
    },

    /// A tool call finished
    ToolCallCompleted {
        /// Tool call ID assigned by the model
        id: String,
        /// Tool name
        name: String,
        /// Wall-clock duration of the call
        duration_ms: u64,
        /// Error message when the tool failed
        error: Option<String>,
    },

    /// The agent finished its response
    Completed {
        /// Number of LLM rounds used
        iterations: usize,
        /// Total prompt tokens across rounds
        input_tokens: usize,
        /// Total completion tokens across rounds
        output_tokens: usize,
    },
}

impl AgentEvent {
    /// Text carried by a delta event
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::TextDelta(text) => Some(text),
            _ => None,
        }
    }
}
