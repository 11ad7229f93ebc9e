//! Concrete agent implementations

pub mod delegating;
pub mod tool;

pub use delegating::DelegateTool;
pub use tool::ToolAgent;
