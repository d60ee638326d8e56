// Restaurant lookup tools over the table loaded at startup

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use primer_core::{Restaurant, ResourceTable};
use serde::Deserialize;
use std::sync::Arc;

pub type RestaurantTable = ResourceTable<Restaurant>;

/// All restaurant tools over one table, in listing order.
pub fn restaurant_tools(table: Arc<RestaurantTable>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(SearchRestaurantTool::new(table.clone())),
        Arc::new(RestaurantsByCategoryTool::new(table.clone())),
        Arc::new(ListRestaurantsTool::new(table)),
    ]
}

/// Look up one restaurant by exact name
pub struct SearchRestaurantTool {
    table: Arc<RestaurantTable>,
}

impl SearchRestaurantTool {
    pub fn new(table: Arc<RestaurantTable>) -> Self {
        Self { table }
    }
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    name: String,
}

#[async_trait::async_trait]
impl Tool for SearchRestaurantTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search_restaurant".to_string(),
            description: "Get hours, phone and address of a restaurant by its exact name"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "name": json_schema_string("Restaurant name, e.g. La Trattoria")
                }),
                vec!["name"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: SearchArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for search_restaurant")?;

        Ok(match self.table.get(&args.name) {
            Ok(restaurant) => CallToolResult::text(serde_json::to_string_pretty(restaurant)?),
            Err(e) => CallToolResult::error(format!(
                "Restaurant '{}' not found. Available restaurants: {}",
                e.key(),
                e.available().join(", ")
            )),
        })
    }
}

/// Filter restaurants by category
pub struct RestaurantsByCategoryTool {
    table: Arc<RestaurantTable>,
}

impl RestaurantsByCategoryTool {
    pub fn new(table: Arc<RestaurantTable>) -> Self {
        Self { table }
    }
}

#[derive(Debug, Deserialize)]
struct CategoryArgs {
    category: String,
}

#[async_trait::async_trait]
impl Tool for RestaurantsByCategoryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "restaurants_by_category".to_string(),
            description: "List the restaurants in a category (Italian, Korean, Japanese, ...)"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "category": json_schema_string("Cuisine category")
                }),
                vec!["category"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: CategoryArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for restaurants_by_category")?;

        let matches = self.table.filter(|r| r.category == args.category);
        Ok(CallToolResult::text(serde_json::to_string_pretty(&matches)?))
    }
}

/// Every restaurant in file order
pub struct ListRestaurantsTool {
    table: Arc<RestaurantTable>,
}

impl ListRestaurantsTool {
    pub fn new(table: Arc<RestaurantTable>) -> Self {
        Self { table }
    }
}

#[async_trait::async_trait]
impl Tool for ListRestaurantsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_restaurants".to_string(),
            description: "List every known restaurant".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
        Ok(CallToolResult::text(serde_json::to_string_pretty(
            &self.table.get_all(),
        )?))
    }
}
