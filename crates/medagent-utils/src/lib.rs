//! Shared utilities for medagent
//!
//! This crate provides common functionality used across the medagent workspace:
//! logging setup and environment-based configuration.

pub mod config;
pub mod logging;

pub use config::{ConfigError, EnvSource};
pub use logging::{DEFAULT_FILTER, LogFormat, init_tracing};
