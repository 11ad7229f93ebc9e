//! Error types for medagent-core

use thiserror::Error;

/// Result type alias for medagent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// Agent initialization failed
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),

    /// The LLM provider returned an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// A tool invocation failed
    #[error("Tool '{name}' failed: {message}")]
    Tool {
        /// Tool name
        name: String,
        /// Failure description
        message: String,
    },
}

impl Error {
    /// Build a tool error
    pub fn tool(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::tool("duckduckgo_search", "timed out");
        assert_eq!(err.to_string(), "Tool 'duckduckgo_search' failed: timed out");

        let err = Error::InitializationFailed("no provider".to_string());
        assert_eq!(err.to_string(), "Agent initialization failed: no provider");
    }
}
