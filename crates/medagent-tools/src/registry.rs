//! Name-indexed tool lookup

use crate::Tool;
use medagent_core::ToolHandle;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Tools available to the runtime, keyed by name
///
/// Agent configurations refer to tools by [`ToolHandle`]; the runtime
/// resolves those handles here. Each agent also gets a registry of its own
/// holding the resolved tools and its delegates.
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<BTreeMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `tool`, returning the tool it replaced under the same name
    pub fn register(&self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        self.tools
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tool.name().to_string(), tool)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Look up the tool a handle refers to
    pub fn resolve(&self, handle: &ToolHandle) -> Option<Arc<dyn Tool>> {
        self.get(handle.name())
    }

    /// Every registered tool, ordered by name
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
