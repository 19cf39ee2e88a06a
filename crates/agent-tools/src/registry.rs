//! Tool registry for managing available tools

use crate::{Tool, ToolDescription};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use tracing::debug;

#[derive(Default)]
struct Entries {
    /// Tools in registration order
    tools: Vec<Arc<dyn Tool>>,
    /// Name -> position in `tools`
    index: HashMap<String, usize>,
}

impl Entries {
    fn insert(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            // Same name: newest tool takes the old slot
            Some(&pos) => self.tools[pos] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }
}

/// Registry for managing tools
///
/// Populated once per agent and read-only afterwards, so it can be shared
/// between agents behind an `Arc`.
///
/// # Example
///
/// ```
/// use agent_tools::ToolRegistry;
/// use agent_tools::builtin::default_tools;
///
/// let registry = ToolRegistry::with_tools(default_tools());
///
/// assert_eq!(registry.names(), vec!["basic_calculator", "reverse_string"]);
/// assert!(registry.describe().starts_with("basic_calculator("));
/// ```
pub struct ToolRegistry {
    entries: RwLock<Entries>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
        }
    }
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the given tools
    pub fn with_tools(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        let registry = Self::new();
        registry.register(tools);
        registry
    }

    /// Replace the registered tool set
    ///
    /// Tools sharing a name overwrite each other: the last one wins and keeps
    /// the position of the first.
    pub fn register(&self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) {
        let mut entries = Entries::default();
        for tool in tools {
            entries.insert(tool);
        }
        debug!(tool_count = entries.tools.len(), "Registered tools");

        let mut guard = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = entries;
    }

    /// Get a tool by name
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let entries = self.read();
        entries
            .index
            .get(name)
            .map(|&pos| Arc::clone(&entries.tools[pos]))
    }

    /// Check whether a tool is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.read().index.contains_key(name)
    }

    /// Names of all registered tools in registration order
    pub fn names(&self) -> Vec<String> {
        self.read()
            .tools
            .iter()
            .map(|tool| tool.name().to_string())
            .collect()
    }

    /// Render every tool's description, in registration order
    pub fn descriptions(&self) -> Vec<ToolDescription> {
        self.read().tools.iter().map(|tool| tool.describe()).collect()
    }

    /// Render the newline-joined description block used in the system prompt
    ///
    /// Recomputed on every call.
    pub fn describe(&self) -> String {
        self.descriptions()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.read().tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.read().tools.is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::Result;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct Fixed {
        name: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl Tool for Fixed {
        async fn invoke(&self, _input: &str) -> Result<Value> {
            Ok(json!(self.reply))
        }

        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "Always returns the same reply."
        }
    }

    fn fixed(name: &'static str, reply: &'static str) -> Arc<dyn Tool> {
        Arc::new(Fixed { name, reply })
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.describe(), "");
        assert!(registry.lookup("anything").is_none());
    }

    #[test]
    fn test_describe_lists_each_tool_once_in_order() {
        let registry = ToolRegistry::with_tools(vec![
            fixed("zeta", "z"),
            fixed("alpha", "a"),
            fixed("mid", "m"),
        ]);

        let described = registry.describe();
        let lines: Vec<&str> = described.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("zeta("));
        assert!(lines[1].starts_with("alpha("));
        assert!(lines[2].starts_with("mid("));

        for name in ["zeta", "alpha", "mid"] {
            assert_eq!(described.matches(&format!("{name}(")).count(), 1);
        }
    }

    #[tokio::test]
    async fn test_duplicate_name_overwrites() {
        let registry = ToolRegistry::with_tools(vec![
            fixed("dup", "first"),
            fixed("other", "o"),
            fixed("dup", "second"),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["dup", "other"]);

        let tool = registry.lookup("dup").unwrap();
        assert_eq!(tool.invoke("").await.unwrap(), json!("second"));
    }

    #[test]
    fn test_register_replaces_previous_set() {
        let registry = ToolRegistry::with_tools(vec![fixed("old", "o")]);
        registry.register(vec![fixed("new", "n")]);

        assert!(!registry.contains("old"));
        assert!(registry.contains("new"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_is_idempotent() {
        let tools = vec![fixed("a", "1"), fixed("b", "2")];
        let registry = ToolRegistry::new();
        registry.register(tools.clone());
        let first = registry.describe();
        registry.register(tools);
        assert_eq!(registry.describe(), first);
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = ToolRegistry::with_tools(vec![fixed("reverse_string", "r")]);
        assert!(registry.lookup("reverse_string").is_some());
        assert!(registry.lookup("Reverse_String").is_none());
        assert!(registry.lookup("reverse").is_none());
    }
}
