// Server assembly: tables and sandboxes wired into the tool registry and resource router

use crate::config::PrimerConfig;
use crate::protocol::{CallToolResult, ResourceContents, ResourceInfo, ResourceTemplate, ToolSchema};
use crate::resources::{ResourceError, ResourceRouter};
use crate::tools::{
    calculator_tools, datetime_tools, filesystem_tools, restaurant_tools, text_tools,
    RestaurantTable, ToolRegistry, ToolTier,
};
use anyhow::{Context, Result};
use primer_core::catalog::{builtin_documents, builtin_users, load_restaurants};
use primer_core::{AllowedRoot, FileSandbox};
use std::sync::Arc;

pub struct PrimerServer {
    registry: ToolRegistry,
    router: ResourceRouter,
}

impl PrimerServer {
    pub fn new(registry: ToolRegistry, router: ResourceRouter) -> Self {
        Self { registry, router }
    }

    /// Load every table once and register all tools and resources
    pub fn from_config(config: &PrimerConfig) -> Result<Self> {
        let tool_files = Arc::new(FileSandbox::flat(
            AllowedRoot::new(config.tool_root()).context("Failed to resolve tool root")?,
        ));
        let resource_files = Arc::new(FileSandbox::nested(
            AllowedRoot::new(config.resource_root()).context("Failed to resolve resource root")?,
        ));

        let documents = Arc::new(builtin_documents().context("Failed to load documents")?);
        let users = Arc::new(builtin_users().context("Failed to load users")?);
        let restaurants: Arc<RestaurantTable> = Arc::new(
            load_restaurants(&config.restaurants_path())
                .context("Failed to load restaurant listings")?,
        );

        let mut registry = ToolRegistry::new();
        registry.register_all(text_tools())?;
        registry.register_all(calculator_tools())?;
        registry.register_all(datetime_tools())?;
        registry.register_all(filesystem_tools(tool_files))?;
        registry.register_all(restaurant_tools(restaurants.clone()))?;

        let router = ResourceRouter::new(documents, users, restaurants, resource_files);

        tracing::info!(
            tools = registry.len(),
            tool_root = %config.tool_root().display(),
            resource_root = %config.resource_root().display(),
            "Server assembled"
        );

        Ok(Self::new(registry, router))
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn router(&self) -> &ResourceRouter {
        &self.router
    }

    pub fn list_tools(&self) -> Vec<(ToolSchema, ToolTier)> {
        self.registry.list_with_tiers()
    }

    pub async fn call_tool(&self, name: &str, arguments: serde_json::Value) -> Result<CallToolResult> {
        let result = self.registry.call(name, arguments).await?;
        if result.is_error() {
            tracing::info!(tool = name, "Tool reported an error");
        }
        Ok(result)
    }

    pub fn read_resource(&self, uri: &str) -> Result<ResourceContents, ResourceError> {
        self.router.read(uri).inspect_err(|e| {
            tracing::info!(uri, kind = e.kind(), "Resource read failed");
        })
    }

    pub fn list_resources(&self) -> Result<Vec<ResourceInfo>, ResourceError> {
        self.router.list()
    }

    pub fn resource_templates(&self) -> Vec<ResourceTemplate> {
        self.router.templates()
    }
}
