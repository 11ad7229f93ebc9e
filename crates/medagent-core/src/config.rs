//! Agent configuration
//!
//! An [`AgentConfig`] is plain data: a model identifier, ordered instructions,
//! capability handles and display flags. A configuration with a non-empty
//! team is a team leader; its members are shared through `Arc`.
//!
//! # Example
//!
//! ```
//! use medagent_core::{AgentConfig, ToolHandle};
//! use std::sync::Arc;
//!
//! let researcher = Arc::new(
//!     AgentConfig::builder("llama-3.3-70b-versatile")
//!         .name("Researcher")
//!         .instruction("Search before answering")
//!         .tool(ToolHandle::new("duckduckgo_search"))
//!         .build(),
//! );
//!
//! let team = AgentConfig::builder("llama-3.3-70b-versatile")
//!     .member(Arc::clone(&researcher))
//!     .instruction("Delegate research questions")
//!     .build();
//!
//! assert!(team.is_team());
//! assert!(Arc::ptr_eq(&team.team[0], &researcher));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque reference to an external capability, resolved by name at runtime
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolHandle(String);

impl ToolHandle {
    /// Create a handle for the tool registered under `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Registry name of the referenced tool
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable description of an agent or a team of agents
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Display name; required for team members
    pub name: Option<String>,

    /// Model identifier passed to the provider
    pub model: String,

    /// Behavioral instructions, in order
    pub instructions: Vec<String>,

    /// Capabilities the agent may call
    pub tools: Vec<ToolHandle>,

    /// Delegate agents, in order (empty for a plain agent)
    pub team: Vec<Arc<AgentConfig>>,

    /// Surface tool calls in the response stream
    pub show_tool_calls: bool,

    /// Ask the model for markdown-formatted output
    pub markdown: bool,
}

impl AgentConfig {
    /// Create a builder for the given model
    pub fn builder(model: impl Into<String>) -> AgentConfigBuilder {
        AgentConfigBuilder::new(model)
    }

    /// Whether this configuration delegates to other agents
    pub fn is_team(&self) -> bool {
        !self.team.is_empty()
    }

    /// Render the system prompt sent with every completion request
    pub fn system_prompt(&self) -> String {
        let mut prompt = String::new();

        if let Some(name) = &self.name {
            prompt.push_str(&format!("You are {name}.\n\n"));
        }

        if self.is_team() {
            prompt.push_str(
                "You are the leader of a team of AI Agents. You can either respond directly \
                 or transfer tasks to other Agents in your team depending on the tools \
                 available to them.\n\n## Agents in your team\n",
            );
            for (index, member) in self.team.iter().enumerate() {
                prompt.push_str(&format!("Agent {}:\n", index + 1));
                if let Some(name) = &member.name {
                    prompt.push_str(&format!("Name: {name}\n"));
                }
                if !member.instructions.is_empty() {
                    prompt.push_str(&format!("Role: {}\n", member.instructions.join("; ")));
                }
                if !member.tools.is_empty() {
                    let tools: Vec<&str> = member.tools.iter().map(ToolHandle::name).collect();
                    prompt.push_str(&format!("Available tools: {}\n", tools.join(", ")));
                }
                prompt.push('\n');
            }
        }

        if !self.instructions.is_empty() || self.markdown {
            prompt.push_str("## Instructions\n");
            for instruction in &self.instructions {
                prompt.push_str(&format!("- {instruction}\n"));
            }
            if self.markdown {
                prompt.push_str("- Use markdown to format your answers.\n");
            }
        }

        prompt.trim_end().to_string()
    }
}

/// Builder for AgentConfig
#[derive(Debug, Clone)]
pub struct AgentConfigBuilder {
    name: Option<String>,
    model: String,
    instructions: Vec<String>,
    tools: Vec<ToolHandle>,
    team: Vec<Arc<AgentConfig>>,
    show_tool_calls: bool,
    markdown: bool,
}

impl AgentConfigBuilder {
    /// Create a new builder
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            name: None,
            model: model.into(),
            instructions: Vec::new(),
            tools: Vec::new(),
            team: Vec::new(),
            show_tool_calls: false,
            markdown: false,
        }
    }

    /// Set the agent name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append one instruction
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instructions.push(instruction.into());
        self
    }

    /// Append several instructions, keeping their order
    pub fn instructions<I, S>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions
            .extend(instructions.into_iter().map(Into::into));
        self
    }

    /// Add a capability
    pub fn tool(mut self, tool: ToolHandle) -> Self {
        self.tools.push(tool);
        self
    }

    /// Add several capabilities, keeping their order
    pub fn tools(mut self, tools: impl IntoIterator<Item = ToolHandle>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Add a delegate agent
    pub fn member(mut self, member: Arc<AgentConfig>) -> Self {
        self.team.push(member);
        self
    }

    /// Show tool calls in the response stream
    pub fn show_tool_calls(mut self, show: bool) -> Self {
        self.show_tool_calls = show;
        self
    }

    /// Request markdown output
    pub fn markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    /// Build the configuration
    pub fn build(self) -> AgentConfig {
        AgentConfig {
            name: self.name,
            model: self.model,
            instructions: self.instructions,
            tools: self.tools,
            team: self.team,
            show_tool_calls: self.show_tool_calls,
            markdown: self.markdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Arc<AgentConfig> {
        Arc::new(
            AgentConfig::builder("model-a")
                .name("Helper")
                .instructions(["First", "Second"])
                .tool(ToolHandle::new("search"))
                .build(),
        )
    }

    #[test]
    fn test_builder_defaults() {
        let config = AgentConfig::builder("model-a").build();
        assert_eq!(config.name, None);
        assert_eq!(config.model, "model-a");
        assert!(config.instructions.is_empty());
        assert!(config.tools.is_empty());
        assert!(!config.is_team());
        assert!(!config.show_tool_calls);
        assert!(!config.markdown);
    }

    #[test]
    fn test_instruction_order_is_kept() {
        let config = AgentConfig::builder("m")
            .instruction("one")
            .instructions(vec!["two".to_string(), "three".to_string()])
            .instruction("four")
            .build();
        assert_eq!(config.instructions, ["one", "two", "three", "four"]);
    }

    #[test]
    fn test_tool_order_is_kept() {
        let config = AgentConfig::builder("m")
            .tool(ToolHandle::new("search"))
            .tools([ToolHandle::new("news"), ToolHandle::new("maps")])
            .build();
        let names: Vec<&str> = config.tools.iter().map(ToolHandle::name).collect();
        assert_eq!(names, ["search", "news", "maps"]);
    }

    #[test]
    fn test_members_are_shared() {
        let helper = member();
        let team = AgentConfig::builder("model-b").member(Arc::clone(&helper)).build();
        assert_eq!(Arc::strong_count(&helper), 2);
        drop(team);
        assert_eq!(Arc::strong_count(&helper), 1);
    }

    #[test]
    fn test_system_prompt_for_plain_agent() {
        let config = AgentConfig::builder("m")
            .name("Helper")
            .instructions(["Be brief"])
            .markdown(true)
            .build();
        assert_eq!(
            config.system_prompt(),
            "You are Helper.\n\n## Instructions\n- Be brief\n- Use markdown to format your answers."
        );
    }

    #[test]
    fn test_system_prompt_lists_team_members() {
        let team = AgentConfig::builder("m")
            .member(member())
            .instruction("Coordinate")
            .build();
        let prompt = team.system_prompt();
        assert!(prompt.starts_with("You are the leader of a team of AI Agents."));
        assert!(prompt.contains("Agent 1:\nName: Helper\nRole: First; Second\nAvailable tools: search"));
        assert!(prompt.ends_with("## Instructions\n- Coordinate"));
        assert!(!prompt.contains("markdown"));
    }

    #[test]
    fn test_empty_config_has_empty_prompt() {
        assert_eq!(AgentConfig::builder("m").build().system_prompt(), "");
    }
}
