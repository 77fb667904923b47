//! Tool registry
//!
//! A fixed, ordered collection of tools assembled at startup and
//! resolved by name during run dispatch. Lookup is a linear scan; the
//! registry never holds more than a handful of entries.

use std::sync::Arc;

use crate::error::Error;
use crate::Result;

use super::Tool;

/// Ordered collection of registered tools.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool. Registration order is preserved.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.push(tool);
    }

    /// Resolve a tool by its exact name.
    pub fn find_by_name(&self, name: &str) -> Result<&Arc<dyn Tool>> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| Error::ToolNotFound(name.to_string()))
    }

    /// Iterate over registered tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
