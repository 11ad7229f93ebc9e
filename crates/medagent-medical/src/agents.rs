//! Medical Agent and team configurations

use medagent_core::AgentConfig;
use medagent_tools::DuckDuckGo;
use std::sync::Arc;

/// Groq model used when none is configured
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Display name of the Medical Agent
pub const MEDICAL_AGENT_NAME: &str = "Medical Agent";

/// Instructions of the Medical Agent, in order
pub const MEDICAL_AGENT_INSTRUCTIONS: [&str; 4] = [
    "Ask clarifying questions if needed to understand symptoms",
    "Provide possible medical causes for given symptoms",
    "Always mention if a professional medical consultation is recommended",
    "Ensure accuracy and responsibility in responses",
];

/// Instructions of the team leader, in order
pub const TEAM_INSTRUCTIONS: [&str; 4] = [
    "Provide possible causes for symptoms",
    "If needed, fetch related medical news or research papers",
    "Ensure information is based on credible sources and is up-to-date",
    "Suggest seeing a healthcare provider for an accurate diagnosis",
];

/// Configure the Medical Agent for `model`
///
/// The agent searches the web and the news with DuckDuckGo, shows its tool
/// calls and answers in markdown.
pub fn create_medical_agent(model: &str) -> AgentConfig {
    AgentConfig::builder(model)
        .name(MEDICAL_AGENT_NAME)
        .instructions(MEDICAL_AGENT_INSTRUCTIONS)
        .tools(DuckDuckGo::handles())
        .show_tool_calls(true)
        .markdown(true)
        .build()
}

/// Configure a team whose only member is `agent`
///
/// The member is shared, not copied. Its model is not required to match
/// `model`.
pub fn create_medical_agent_team(agent: Arc<AgentConfig>, model: &str) -> AgentConfig {
    AgentConfig::builder(model)
        .member(agent)
        .instructions(TEAM_INSTRUCTIONS)
        .show_tool_calls(true)
        .markdown(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medical_agent() {
        let agent = create_medical_agent(DEFAULT_MODEL);
        assert_eq!(agent.name.as_deref(), Some("Medical Agent"));
        assert_eq!(agent.model, "llama-3.3-70b-versatile");
        assert_eq!(agent.instructions, MEDICAL_AGENT_INSTRUCTIONS);
        assert_eq!(agent.tools, DuckDuckGo::handles());
        let tools: Vec<&str> = agent.tools.iter().map(|t| t.name()).collect();
        assert_eq!(tools, ["duckduckgo_search", "duckduckgo_news"]);
        assert!(agent.show_tool_calls);
        assert!(agent.markdown);
        assert!(!agent.is_team());
    }

    #[test]
    fn test_model_is_passed_through() {
        for model in ["llama-3.1-8b-instant", "", "some/custom:model"] {
            let agent = create_medical_agent(model);
            assert_eq!(agent.model, model);
            assert_eq!(agent.instructions.len(), 4);
            assert_eq!(agent.instructions[0], "Ask clarifying questions if needed to understand symptoms");
            assert_eq!(agent.instructions[3], "Ensure accuracy and responsibility in responses");
        }
    }

    #[test]
    fn test_factory_is_idempotent() {
        assert_eq!(create_medical_agent("m"), create_medical_agent("m"));
        assert_ne!(create_medical_agent("m"), create_medical_agent("n"));
    }

    #[test]
    fn test_team_shares_the_agent() {
        let agent = Arc::new(create_medical_agent(DEFAULT_MODEL));
        let team = create_medical_agent_team(Arc::clone(&agent), DEFAULT_MODEL);

        assert_eq!(team.team.len(), 1);
        assert!(Arc::ptr_eq(&team.team[0], &agent));
        assert_eq!(team.name, None);
        assert_eq!(team.model, DEFAULT_MODEL);
        assert_eq!(team.instructions, TEAM_INSTRUCTIONS);
        assert!(team.tools.is_empty());
        assert!(team.show_tool_calls);
        assert!(team.markdown);

        // The member outlives the team
        drop(team);
        assert_eq!(Arc::strong_count(&agent), 1);
    }

    #[test]
    fn test_team_accepts_a_different_model() {
        let agent = Arc::new(create_medical_agent("llama-3.1-8b-instant"));
        let team = create_medical_agent_team(Arc::clone(&agent), DEFAULT_MODEL);
        assert_eq!(team.model, DEFAULT_MODEL);
        assert_eq!(team.team[0].model, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_team_prompt_lists_the_medical_agent() {
        let agent = Arc::new(create_medical_agent(DEFAULT_MODEL));
        let prompt = create_medical_agent_team(agent, DEFAULT_MODEL).system_prompt();
        assert!(prompt.contains("Name: Medical Agent"));
        assert!(prompt.contains("Available tools: duckduckgo_search, duckduckgo_news"));
        assert!(prompt.contains("- Suggest seeing a healthcare provider for an accurate diagnosis"));
        assert!(prompt.ends_with("- Use markdown to format your answers."));
    }
}
