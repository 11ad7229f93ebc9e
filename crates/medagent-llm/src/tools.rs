//! Tool definitions offered to the model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name, description and JSON Schema input of a callable tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name the model calls the tool by; unique within an agent
    pub name: String,

    /// What the tool does, written for the model
    pub description: String,

    /// JSON Schema of the arguments object
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// JSON Schema helpers for tool arguments
pub mod schema {
    use serde_json::{Map, Value, json};

    /// Builder for an `object` schema
    ///
    /// ```
    /// use medagent_llm::tools::schema::{self, ObjectSchema};
    ///
    /// let input = ObjectSchema::new()
    ///     .required("query", schema::string("Search query"))
    ///     .optional("max_results", schema::integer("Maximum results"))
    ///     .build();
    /// assert_eq!(input["required"][0], "query");
    /// assert_eq!(input["properties"]["max_results"]["type"], "integer");
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct ObjectSchema {
        properties: Map<String, Value>,
        required: Vec<String>,
    }

    impl ObjectSchema {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a property the model must always supply
        pub fn required(mut self, name: &str, property: Value) -> Self {
            self.required.push(name.to_string());
            self.optional(name, property)
        }

        /// Add a property the model may omit
        pub fn optional(mut self, name: &str, property: Value) -> Self {
            self.properties.insert(name.to_string(), property);
            self
        }

        pub fn build(self) -> Value {
            json!({
                "type": "object",
                "properties": self.properties,
                "required": self.required,
            })
        }
    }

    /// String property
    pub fn string(description: &str) -> Value {
        json!({ "type": "string", "description": description })
    }

    /// Integer property
    pub fn integer(description: &str) -> Value {
        json!({ "type": "integer", "description": description })
    }
}
