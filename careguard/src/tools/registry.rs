use std::collections::HashMap;

use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::r#trait::Tool;

/// Registry of tools, keyed by name.
///
/// # Examples
///
/// ```
/// use careguard::tools::ToolRegistry;
///
/// let registry = ToolRegistry::new();
/// assert!(registry.list().is_empty());
/// ```
///
/// # Interaction
///
/// - Built once at startup and shared as `Arc<ToolRegistry>` with the reasoning engine
/// - `list()` feeds the LLM client's tool definitions; `call()` is used by the act node
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registers a tool. A tool with the same name is replaced.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, tool: Box<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Specs of all registered tools, sorted by name.
    pub fn list(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.values().map(|tool| tool.spec()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Calls a tool by name.
    ///
    /// # Errors
    ///
    /// `ToolSourceError::NotFound` when no tool has that name; otherwise whatever the
    /// tool returns.
    pub async fn call(&self, name: &str, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolSourceError::NotFound(name.to_string()))?;
        tool.call(args).await
    }
}
