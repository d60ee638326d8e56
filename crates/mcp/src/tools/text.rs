// Liveness and string tools that take at most one text argument

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOperation {
    Ping,
    Echo,
    Uppercase,
    Reverse,
}

impl TextOperation {
    pub const ALL: [TextOperation; 4] = [
        TextOperation::Ping,
        TextOperation::Echo,
        TextOperation::Uppercase,
        TextOperation::Reverse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TextOperation::Ping => "ping",
            TextOperation::Echo => "echo",
            TextOperation::Uppercase => "uppercase",
            TextOperation::Reverse => "reverse",
        }
    }

    fn description(self) -> &'static str {
        match self {
            TextOperation::Ping => "Check that the server responds",
            TextOperation::Echo => "Return the message unchanged, prefixed with 'Echo: '",
            TextOperation::Uppercase => "Convert text to upper case",
            TextOperation::Reverse => "Reverse the characters of a text",
        }
    }

    /// Name of the single string argument, if any.
    fn argument(self) -> Option<&'static str> {
        match self {
            TextOperation::Ping => None,
            TextOperation::Echo => Some("message"),
            TextOperation::Uppercase | TextOperation::Reverse => Some("text"),
        }
    }

    pub fn apply(self, input: &str) -> String {
        match self {
            TextOperation::Ping => "pong".to_string(),
            TextOperation::Echo => format!("Echo: {}", input),
            TextOperation::Uppercase => input.to_uppercase(),
            TextOperation::Reverse => input.chars().rev().collect(),
        }
    }
}

/// One text operation exposed as a tool
pub struct TextTool {
    op: TextOperation,
}

impl TextTool {
    pub fn new(op: TextOperation) -> Self {
        Self { op }
    }
}

/// Every text tool, in listing order.
pub fn text_tools() -> Vec<Arc<dyn Tool>> {
    TextOperation::ALL
        .into_iter()
        .map(|op| Arc::new(TextTool::new(op)) as Arc<dyn Tool>)
        .collect()
}

#[derive(Debug, Deserialize)]
struct TextArgs {
    #[serde(alias = "message")]
    text: String,
}

#[async_trait::async_trait]
impl Tool for TextTool {
    fn schema(&self) -> ToolSchema {
        let (properties, required) = match self.op.argument() {
            Some(arg) => (
                serde_json::json!({ arg: json_schema_string("Input text") }),
                vec![arg],
            ),
            None => (serde_json::json!({}), Vec::new()),
        };
        ToolSchema {
            name: self.op.name().to_string(),
            description: self.op.description().to_string(),
            input_schema: json_schema_object(properties, required),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        if self.op.argument().is_none() {
            return Ok(CallToolResult::text(self.op.apply("")));
        }

        let args: TextArgs = serde_json::from_value(arguments)
            .with_context(|| format!("Invalid arguments for {}", self.op.name()))?;
        Ok(CallToolResult::text(self.op.apply(&args.text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn run(op: TextOperation, args: serde_json::Value) -> String {
        TextTool::new(op).execute(args).await.unwrap().joined_text()
    }

    #[tokio::test]
    async fn test_operations() {
        assert_eq!(run(TextOperation::Ping, json!({})).await, "pong");
        assert_eq!(run(TextOperation::Echo, json!({"message": "hi"})).await, "Echo: hi");
        assert_eq!(run(TextOperation::Uppercase, json!({"text": "MCp"})).await, "MCP");
        assert_eq!(run(TextOperation::Reverse, json!({"text": "안녕 mcp"})).await, "pcm 녕안");
    }

    #[tokio::test]
    async fn test_ping_ignores_arguments() {
        assert_eq!(run(TextOperation::Ping, serde_json::Value::Null).await, "pong");
    }

    #[tokio::test]
    async fn test_missing_text_is_err() {
        let tool = TextTool::new(TextOperation::Uppercase);
        assert!(tool.execute(json!({})).await.is_err());
    }

    #[test]
    fn test_schemas_name_their_argument() {
        let echo = TextTool::new(TextOperation::Echo).schema();
        assert_eq!(echo.input_schema["required"], json!(["message"]));

        let ping = TextTool::new(TextOperation::Ping).schema();
        assert_eq!(ping.input_schema["required"], json!([]));
        assert_eq!(text_tools().len(), 4);
    }
}
