//! Agent runtime for executing agents with dependency injection
//!
//! This crate provides the runtime infrastructure for executing agents:
//! the streaming [`AgentExecutor`] loop, the [`AgentRuntime`] that turns an
//! [`medagent_core::AgentConfig`] into a runnable agent, and the
//! [`DelegateTool`] through which a team leader hands tasks to its members.

pub mod agents;
pub mod executor;
pub mod runtime;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types
pub use agents::{DelegateTool, ToolAgent};
pub use executor::{AgentExecutor, ExecutorConfig, ITERATION_LIMIT_NOTICE};
pub use runtime::{AgentRuntime, AgentRuntimeBuilder, RuntimeConfig};
