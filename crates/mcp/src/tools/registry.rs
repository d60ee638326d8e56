// Tool trait and the registry the server dispatches through

use crate::protocol::{CallToolResult, ToolSchema};
use anyhow::{bail, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for MCP
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments.
    ///
    /// Failures the caller can fix (bad file name, unknown key) come back as
    /// an error result; `Err` is reserved for malformed arguments and bugs.
    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult>;

    /// What the tool may do to state outside the process
    fn tier(&self) -> ToolTier {
        ToolTier::ReadOnly
    }
}

/// Tool access tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ToolTier {
    /// Pure computation or reads
    ReadOnly,
    /// Creates or overwrites data
    Write,
    /// Removes data
    Destructive,
}

impl fmt::Display for ToolTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolTier::ReadOnly => write!(f, "read-only"),
            ToolTier::Write => write!(f, "write"),
            ToolTier::Destructive => write!(f, "destructive"),
        }
    }
}

/// Tool registry; lists tools in registration order
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register a tool; names must be unique
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.schema().name;
        if self.by_name.contains_key(&name) {
            bail!("Tool already registered: {}", name);
        }
        tracing::debug!(tool = %name, tier = %tool.tier(), "Registered tool");
        self.by_name.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Register several tools in order
    pub fn register_all(&mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Result<()> {
        for tool in tools {
            self.register(tool)?;
        }
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.by_name.get(name).map(|&i| self.tools[i].clone())
    }

    /// List all tool schemas
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    /// Schemas paired with tiers, for display
    pub fn list_with_tiers(&self) -> Vec<(ToolSchema, ToolTier)> {
        self.tools.iter().map(|t| (t.schema(), t.tier())).collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a call; unknown names are an error result listing what exists
    pub async fn call(&self, name: &str, arguments: serde_json::Value) -> Result<CallToolResult> {
        match self.get(name) {
            Some(tool) => {
                tracing::debug!(tool = name, "Calling tool");
                tool.execute(arguments).await
            }
            None => {
                let available: Vec<_> = self.tools.iter().map(|t| t.schema().name).collect();
                Ok(CallToolResult::error(format!(
                    "Unknown tool: {}. Available tools: {}",
                    name,
                    available.join(", ")
                )))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_number(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "number",
        "description": description
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(&'static str);

    #[async_trait::async_trait]
    impl Tool for Echo {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.0.to_string(),
                description: "Echo the message back".to_string(),
                input_schema: json_schema_object(
                    serde_json::json!({ "message": json_schema_string("Message to echo") }),
                    vec!["message"],
                ),
            }
        }

        async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
            Ok(CallToolResult::text(
                arguments["message"].as_str().unwrap_or_default(),
            ))
        }
    }

    #[tokio::test]
    async fn test_registry_lists_in_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("zeta"))).unwrap();
        registry.register(Arc::new(Echo("alpha"))).unwrap();

        let names: Vec<_> = registry.list_schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert!(registry.contains("alpha"));
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_registration_fails() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("echo"))).unwrap();
        assert!(registry.register(Arc::new(Echo("echo"))).is_err());
    }

    #[tokio::test]
    async fn test_call_dispatches_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("echo"))).unwrap();

        let result = registry
            .call("echo", serde_json::json!({"message": "hello"}))
            .await
            .unwrap();
        assert!(!result.is_error());
        assert_eq!(result.joined_text(), "hello");

        let missing = registry.call("nope", serde_json::json!({})).await.unwrap();
        assert!(missing.is_error());
        assert!(missing.joined_text().contains("Available tools: echo"));
    }
}
