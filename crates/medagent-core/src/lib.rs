//! Core abstractions for medagent
//!
//! This crate defines the fundamental traits and types used throughout the
//! workspace: the streaming [`Agent`] trait, the immutable [`AgentConfig`]
//! that describes an agent (or a team of agents), and the shared error type.

pub mod agent;
pub mod config;
pub mod error;
pub mod event;

pub use agent::{Agent, EventStream};
pub use config::{AgentConfig, AgentConfigBuilder, ToolHandle};
pub use error::{Error, Result};
pub use event::AgentEvent;
