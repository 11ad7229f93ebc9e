//! Tool agent implementation (wraps AgentExecutor)

use crate::executor::AgentExecutor;
use medagent_core::{Agent, EventStream};

/// An agent that uses the LLM loop with tool execution
///
/// ToolAgent wraps the AgentExecutor to provide the Agent trait interface.
/// Team leaders are ToolAgents too; their members are reached through
/// delegate tools in the executor's registry.
///
/// # Example
///
/// ```no_run
/// use futures::StreamExt;
/// use medagent_core::{Agent, AgentConfig, AgentEvent};
/// use medagent_runtime::AgentRuntime;
/// use std::sync::Arc;
///
/// # async fn example(runtime: AgentRuntime) -> medagent_core::Result<()> {
/// let config = Arc::new(AgentConfig::builder("llama-3.3-70b-versatile").build());
/// let agent = runtime.create_agent(config)?;
///
/// let mut events = agent.stream("Summarize the causes of fatigue".to_string());
/// while let Some(event) = events.next().await {
///     if let AgentEvent::TextDelta(text) = event? {
///         print!("{text}");
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct ToolAgent {
    executor: AgentExecutor,
    name: String,
}

impl ToolAgent {
    /// Create a new tool agent
    pub fn new(executor: AgentExecutor, name: impl Into<String>) -> Self {
        Self {
            executor,
            name: name.into(),
        }
    }

    /// Get a reference to the underlying executor
    pub fn executor(&self) -> &AgentExecutor {
        &self.executor
    }
}

impl Agent for ToolAgent {
    fn stream(&self, input: String) -> EventStream<'_> {
        self.executor.stream(input)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
