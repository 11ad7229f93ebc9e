//! The `Tool` trait

use async_trait::async_trait;
use medagent_core::Result;
use medagent_llm::ToolDefinition;
use serde_json::Value;

/// A capability an agent can call during a response
///
/// ```
/// use async_trait::async_trait;
/// use medagent_llm::tools::schema::{self, ObjectSchema};
/// use medagent_tools::Tool;
/// use serde_json::{Value, json};
///
/// struct Shout;
///
/// #[async_trait]
/// impl Tool for Shout {
///     async fn execute(&self, params: Value) -> medagent_core::Result<Value> {
///         let text = params["text"].as_str().unwrap_or_default();
///         Ok(json!(text.to_uppercase()))
///     }
///
///     fn name(&self) -> &str {
///         "shout"
///     }
///
///     fn description(&self) -> &str {
///         "Upper-case the given text"
///     }
///
///     fn input_schema(&self) -> Value {
///         ObjectSchema::new().required("text", schema::string("Text to shout")).build()
///     }
/// }
///
/// assert_eq!(Shout.definition().name, "shout");
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Run the tool on arguments produced by the model
    ///
    /// A string result reaches the model verbatim; any other value is sent
    /// as serialized JSON.
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Name the model calls the tool by
    fn name(&self) -> &str;

    /// When and why to use the tool, written for the model
    fn description(&self) -> &str;

    /// JSON Schema of the arguments object
    fn input_schema(&self) -> Value;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema())
    }
}
