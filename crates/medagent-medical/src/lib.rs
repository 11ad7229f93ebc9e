//! Medical symptom analysis agents
//!
//! This crate configures two agents on top of the medagent runtime:
//!
//! - the **Medical Agent**, which searches the web and the news with
//!   DuckDuckGo and suggests possible causes for a set of symptoms;
//! - a **team** that delegates to the Medical Agent and keeps the answer
//!   grounded and responsible.
//!
//! Both configurations are plain data. [`get_medical_causes`] sends the
//! symptoms prompt to an instantiated team and streams the answer.
//!
//! # Example
//!
//! ```no_run
//! use medagent_medical::{
//!     DEFAULT_MODEL, MedicalConfig, ResponsePrinter, create_medical_agent,
//!     create_medical_agent_team, get_medical_causes,
//! };
//! use medagent_utils::EnvSource;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let env = EnvSource::load(Path::new(".env"))?;
//! let config = MedicalConfig::from_env_source(&env)?;
//! let runtime = config.build_runtime()?;
//!
//! let agent = Arc::new(create_medical_agent(DEFAULT_MODEL));
//! let team = runtime.create_agent(Arc::new(create_medical_agent_team(agent, DEFAULT_MODEL)))?;
//!
//! let mut printer = ResponsePrinter::new(std::io::stdout());
//! get_medical_causes(&team, "itchy skin, nausea, abdomen pain", &mut printer).await?;
//! # Ok(())
//! # }
//! ```

pub mod agents;
pub mod config;
pub mod error;
pub mod invoke;
pub mod output;
pub mod prompt;

pub use agents::{
    DEFAULT_MODEL, MEDICAL_AGENT_INSTRUCTIONS, MEDICAL_AGENT_NAME, TEAM_INSTRUCTIONS,
    create_medical_agent, create_medical_agent_team,
};
pub use config::{MedicalConfig, MedicalConfigBuilder};
pub use error::{MedicalError, Result};
pub use invoke::get_medical_causes;
pub use output::ResponsePrinter;
pub use prompt::{DEFAULT_SYMPTOMS, symptoms_prompt};
