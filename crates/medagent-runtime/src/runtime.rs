//! Runtime for executing agents with dependency injection
//!
//! The AgentRuntime manages shared resources like the LLM provider and the
//! tool registry, and turns agent configurations into runnable agents.

use crate::agents::{DelegateTool, ToolAgent};
use crate::executor::{AgentExecutor, ExecutorConfig};
use medagent_core::{Agent, AgentConfig, Error, Result};
use medagent_llm::LLMProvider;
use medagent_tools::ToolRegistry;
use std::sync::Arc;
use tracing::{debug, info};

// Names given to agents whose configuration has none
const UNNAMED_AGENT: &str = "Agent";
const UNNAMED_TEAM: &str = "Team Leader";

/// Configuration for the agent runtime
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Maximum LLM rounds per prompt
    pub max_iterations: usize,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Sampling temperature; provider default when `None`
    pub temperature: Option<f32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            max_tokens: 4096,
            temperature: None,
        }
    }
}

/// Runtime for executing agents with dependency injection
///
/// # Example
///
/// ```no_run
/// use medagent_core::{AgentConfig, ToolHandle};
/// use medagent_llm::providers::OpenAIProvider;
/// use medagent_runtime::AgentRuntime;
/// use medagent_tools::{DuckDuckGoTool, SearchConfig, ToolRegistry};
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tools = Arc::new(ToolRegistry::new());
/// tools.register(Arc::new(DuckDuckGoTool::new(SearchConfig::default())?));
///
/// let runtime = AgentRuntime::builder()
///     .provider(Arc::new(OpenAIProvider::groq("gsk_...")?))
///     .tool_registry(tools)
///     .build()?;
///
/// let config = AgentConfig::builder("llama-3.3-70b-versatile")
///     .name("Researcher")
///     .tool(DuckDuckGoTool::handle())
///     .build();
/// let agent = runtime.create_agent(Arc::new(config))?;
/// # Ok(())
/// # }
/// ```
pub struct AgentRuntime {
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    config: RuntimeConfig,
}

impl AgentRuntime {
    /// Create a new agent runtime
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tool_registry: Arc<ToolRegistry>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            config,
        }
    }

    /// Create a new runtime builder
    pub fn builder() -> AgentRuntimeBuilder {
        AgentRuntimeBuilder::new()
    }

    /// Get a reference to the LLM provider
    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    /// Get a reference to the tool registry
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// Get a reference to the runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Instantiate an agent (or a team leader) from its configuration
    ///
    /// Tool handles are resolved against the runtime's registry. Each team
    /// member is instantiated recursively and attached as a delegate tool.
    pub fn create_agent(&self, config: Arc<AgentConfig>) -> Result<ToolAgent> {
        let registry = ToolRegistry::new();

        for handle in &config.tools {
            let tool = self.tool_registry.resolve(handle).ok_or_else(|| {
                Error::InitializationFailed(format!("Unknown tool '{handle}'"))
            })?;
            registry.register(tool);
        }

        for member_config in &config.team {
            let Some(member_name) = member_config.name.as_deref() else {
                return Err(Error::InitializationFailed(
                    "Team members must have a name".to_string(),
                ));
            };
            if member_config.model != config.model {
                debug!(
                    member = member_name,
                    member_model = %member_config.model,
                    team_model = %config.model,
                    "Team member uses a different model"
                );
            }

            let tool_name = DelegateTool::tool_name_for(member_name);
            if registry.get(&tool_name).is_some() {
                return Err(Error::InitializationFailed(format!(
                    "Duplicate team member or tool name '{tool_name}'"
                )));
            }

            let member: Arc<dyn Agent> = Arc::new(self.create_agent(Arc::clone(member_config))?);
            registry.register(Arc::new(DelegateTool::new(member, &member_config.instructions)));
        }

        let system_prompt = config.system_prompt();
        let executor_config = ExecutorConfig {
            max_iterations: self.config.max_iterations,
            model: config.model.clone(),
            system_prompt: (!system_prompt.is_empty()).then_some(system_prompt),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            show_tool_calls: config.show_tool_calls,
        };

        let fallback = if config.is_team() { UNNAMED_TEAM } else { UNNAMED_AGENT };
        let name = config.name.clone().unwrap_or_else(|| fallback.to_string());
        info!(
            agent = %name,
            model = %config.model,
            tools = registry.len(),
            members = config.team.len(),
            "Agent created"
        );

        let executor = AgentExecutor::new(Arc::clone(&self.provider), Arc::new(registry), executor_config);
        Ok(ToolAgent::new(executor, name))
    }
}

/// Builder for AgentRuntime
pub struct AgentRuntimeBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tool_registry: Option<Arc<ToolRegistry>>,
    config: RuntimeConfig,
}

impl AgentRuntimeBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            tool_registry: None,
            config: RuntimeConfig::default(),
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = Some(registry);
        self
    }

    /// Set the runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the runtime
    pub fn build(self) -> Result<AgentRuntime> {
        let provider = self.provider.ok_or_else(|| {
            Error::InitializationFailed("LLM provider not set".to_string())
        })?;

        let tool_registry = self
            .tool_registry
            .unwrap_or_else(|| Arc::new(ToolRegistry::new()));

        Ok(AgentRuntime::new(provider, tool_registry, self.config))
    }
}

impl Default for AgentRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EchoTool, ScriptedProvider, finished, text, tool_use};
    use futures::TryStreamExt;
    use medagent_core::{AgentEvent, ToolHandle};
    use medagent_llm::StopReason;
    use serde_json::json;

    fn runtime(provider: Arc<ScriptedProvider>) -> AgentRuntime {
        let tools = Arc::new(ToolRegistry::new());
        tools.register(Arc::new(EchoTool));
        AgentRuntime::builder()
            .provider(provider)
            .tool_registry(tools)
            .config(RuntimeConfig {
                max_iterations: 5,
                ..RuntimeConfig::default()
            })
            .build()
            .unwrap()
    }

    fn member() -> Arc<AgentConfig> {
        Arc::new(
            AgentConfig::builder("member-model")
                .name("Medical Agent")
                .instruction("Diagnose")
                .tool(ToolHandle::new("echo"))
                .build(),
        )
    }

    #[test]
    fn test_builder_requires_provider() {
        let result = AgentRuntime::builder().build();
        assert!(matches!(result, Err(Error::InitializationFailed(_))));
    }

    #[test]
    fn test_unknown_tool_handle_is_rejected() {
        let runtime = runtime(Arc::new(ScriptedProvider::default()));
        let config = AgentConfig::builder("m").tool(ToolHandle::new("nope")).build();
        let err = runtime.create_agent(Arc::new(config)).err().unwrap();
        assert!(matches!(err, Error::InitializationFailed(ref m) if m.contains("nope")));
    }

    #[test]
    fn test_unnamed_member_is_rejected() {
        let runtime = runtime(Arc::new(ScriptedProvider::default()));
        let config = AgentConfig::builder("m")
            .member(Arc::new(AgentConfig::builder("m").build()))
            .build();
        assert!(matches!(
            runtime.create_agent(Arc::new(config)),
            Err(Error::InitializationFailed(_))
        ));
    }

    #[test]
    fn test_duplicate_members_are_rejected() {
        let runtime = runtime(Arc::new(ScriptedProvider::default()));
        let config = AgentConfig::builder("m").member(member()).member(member()).build();
        assert!(matches!(
            runtime.create_agent(Arc::new(config)),
            Err(Error::InitializationFailed(ref m)) if m.contains("transfer_task_to_medical_agent")
        ));
    }

    #[test]
    fn test_agent_settings() {
        let runtime = runtime(Arc::new(ScriptedProvider::default()));

        let agent = runtime.create_agent(member()).unwrap();
        assert_eq!(agent.name(), "Medical Agent");
        let config = agent.executor().config();
        assert_eq!(config.model, "member-model");
        assert_eq!(config.max_iterations, 5);
        assert!(config.system_prompt.as_deref().unwrap().starts_with("You are Medical Agent."));
        assert!(agent.executor().tools().get("echo").is_some());

        let team = runtime
            .create_agent(Arc::new(AgentConfig::builder("team-model").member(member()).build()))
            .unwrap();
        assert_eq!(team.name(), "Team Leader");
        assert!(team.executor().tools().get("echo").is_none());
        assert!(
            team.executor()
                .tools()
                .get("transfer_task_to_medical_agent")
                .is_some()
        );

        let bare = runtime
            .create_agent(Arc::new(AgentConfig::builder("m").build()))
            .unwrap();
        assert_eq!(bare.name(), "Agent");
        assert_eq!(bare.executor().config().system_prompt, None);
    }

    #[tokio::test]
    async fn test_team_delegates_to_member() {
        // Leader delegates, member searches then answers, leader summarizes
        let provider = Arc::new(ScriptedProvider::new(vec![
            vec![
                tool_use(
                    "call_lead",
                    "transfer_task_to_medical_agent",
                    json!({"task_description": "Find causes of rash", "expected_output": "List"}),
                ),
                finished(StopReason::ToolUse),
            ],
            vec![
                tool_use("call_member", "echo", json!({"query": "rash"})),
                finished(StopReason::ToolUse),
            ],
            vec![text("Eczema."), finished(StopReason::EndTurn)],
            vec![text("Possible cause: eczema."), finished(StopReason::EndTurn)],
        ]));
        let runtime = runtime(provider.clone());
        let team = runtime
            .create_agent(Arc::new(
                AgentConfig::builder("team-model")
                    .member(member())
                    .show_tool_calls(true)
                    .build(),
            ))
            .unwrap();

        let events: Vec<AgentEvent> = team
            .stream("rash".to_string())
            .try_collect()
            .await
            .unwrap();

        // Only the leader's own tool call is visible
        let started: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                AgentEvent::ToolCallStarted { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(started, ["transfer_task_to_medical_agent"]);

        let answer: String = events.iter().filter_map(AgentEvent::as_text).collect();
        assert_eq!(answer, "Possible cause: eczema.");

        let requests = provider.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].model, "team-model");
        assert_eq!(requests[1].model, "member-model");
        assert!(
            requests[1].messages[0]
                .text()
                .unwrap()
                .starts_with("Find causes of rash")
        );
    }
}
