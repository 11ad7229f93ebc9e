//! Tool management and execution framework for medagent
//!
//! This crate provides a framework for defining and executing tools (functions)
//! that agents can use to perform actions, plus the DuckDuckGo toolkit (web
//! and news search) used by the medical agents.

pub mod duckduckgo;
pub mod registry;
pub mod tool;

pub use duckduckgo::{DuckDuckGo, DuckDuckGoNewsTool, DuckDuckGoTool, SearchConfig};
pub use registry::ToolRegistry;
pub use tool::Tool;
