//! Error types for the medical agents

use medagent_llm::LLMError;
use medagent_utils::ConfigError;
use thiserror::Error;

/// Medical agent errors
#[derive(Debug, Error)]
pub enum MedicalError {
    /// Configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Agent construction or execution failed
    #[error(transparent)]
    Agent(#[from] medagent_core::Error),

    /// Writing the response failed
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for medical agent operations
pub type Result<T> = std::result::Result<T, MedicalError>;

impl From<LLMError> for MedicalError {
    fn from(err: LLMError) -> Self {
        Self::Agent(err.into())
    }
}
