// Arithmetic tools on two numbers

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_number, json_schema_object, Tool};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Power,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Power => "power",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Operation::Add => "Add two numbers",
            Operation::Subtract => "Subtract b from a",
            Operation::Multiply => "Multiply two numbers",
            Operation::Divide => "Divide a by b",
            Operation::Power => "Raise base to the power of exponent",
        }
    }

    /// Argument names, in (left, right) order.
    fn operands(self) -> (&'static str, &'static str) {
        match self {
            Operation::Power => ("base", "exponent"),
            _ => ("a", "b"),
        }
    }

    /// `None` when the result is undefined.
    pub fn apply(self, left: f64, right: f64) -> Option<f64> {
        match self {
            Operation::Add => Some(left + right),
            Operation::Subtract => Some(left - right),
            Operation::Multiply => Some(left * right),
            Operation::Divide if right == 0.0 => None,
            Operation::Divide => Some(left / right),
            Operation::Power => Some(left.powf(right)),
        }
    }
}

/// One calculator operation exposed as a tool
pub struct CalculatorTool {
    op: Operation,
}

impl CalculatorTool {
    pub fn new(op: Operation) -> Self {
        Self { op }
    }
}

/// Every calculator tool, in listing order.
pub fn calculator_tools() -> Vec<Arc<dyn Tool>> {
    Operation::ALL
        .into_iter()
        .map(|op| Arc::new(CalculatorTool::new(op)) as Arc<dyn Tool>)
        .collect()
}

#[derive(Debug, Deserialize)]
struct Operands {
    #[serde(alias = "base")]
    a: f64,
    #[serde(alias = "exponent")]
    b: f64,
}

#[async_trait::async_trait]
impl Tool for CalculatorTool {
    fn schema(&self) -> ToolSchema {
        let (left, right) = self.op.operands();
        ToolSchema {
            name: self.op.name().to_string(),
            description: self.op.description().to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    left: json_schema_number("Left operand"),
                    right: json_schema_number("Right operand")
                }),
                vec![left, right],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: Operands = serde_json::from_value(arguments)
            .with_context(|| format!("Invalid arguments for {}", self.op.name()))?;

        Ok(match self.op.apply(args.a, args.b) {
            Some(value) => CallToolResult::text(value.to_string()),
            None => CallToolResult::error("Cannot divide by zero"),
        })
    }
}
