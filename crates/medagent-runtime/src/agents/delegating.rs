//! Delegation from a team leader to one of its members
//!
//! Each team member is exposed to the leader's model as a tool named
//! `transfer_task_to_<member>`. Calling it runs the member on the composed
//! task and returns the member's full answer as the tool result.

use async_trait::async_trait;
use medagent_core::{Agent, Error, Result};
use medagent_llm::tools::schema::{self, ObjectSchema};
use medagent_tools::Tool;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Tool that hands a task to a team member
pub struct DelegateTool {
    tool_name: String,
    description: String,
    agent: Arc<dyn Agent>,
}

#[derive(Debug, Deserialize)]
struct DelegateParams {
    task_description: String,
    expected_output: String,
    #[serde(default)]
    additional_information: Option<String>,
}

impl DelegateTool {
    /// Wrap `agent`, described to the leader by the member's role
    pub fn new(agent: Arc<dyn Agent>, role: &[String]) -> Self {
        let member = agent.name().to_string();
        let mut description = format!("Use this function to transfer a task to {member}.");
        if !role.is_empty() {
            description.push_str(&format!(" Role: {}", role.join("; ")));
        }
        Self {
            tool_name: Self::tool_name_for(&member),
            description,
            agent,
        }
    }

    /// Tool name used for a member called `member`
    pub fn tool_name_for(member: &str) -> String {
        format!("transfer_task_to_{}", snake_case(member))
    }

    /// The member this tool delegates to
    pub fn agent(&self) -> &Arc<dyn Agent> {
        &self.agent
    }
}

fn compose_task(params: &DelegateParams) -> String {
    let mut task = params.task_description.trim().to_string();
    if let Some(info) = params
        .additional_information
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        task.push_str(&format!("\n\n<additional_information>\n{info}\n</additional_information>"));
    }
    task.push_str(&format!(
        "\n\n<expected_output>\n{}\n</expected_output>",
        params.expected_output.trim()
    ));
    task
}

/// Lowercase words joined by single underscores
fn snake_case(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

#[async_trait]
impl Tool for DelegateTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let params: DelegateParams = serde_json::from_value(params)
            .map_err(|e| Error::tool(&self.tool_name, format!("Invalid parameters: {e}")))?;

        let member = self.agent.name();
        info!(member = %member, "Delegating task to team member");
        let answer = self.agent.process(compose_task(&params)).await?;
        info!(member = %member, answer_length = answer.len(), "Team member finished");
        Ok(Value::String(answer))
    }

    fn name(&self) -> &str {
        &self.tool_name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        ObjectSchema::new()
            .required(
                "task_description",
                schema::string("A clear and concise description of the task the agent should achieve."),
            )
            .required("expected_output", schema::string("The expected output from the agent."))
            .optional(
                "additional_information",
                schema::string("Additional information that will help the agent complete the task."),
            )
            .build()
    }
}
