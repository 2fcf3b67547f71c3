// ABOUTME: Ordered tool registry mapping MCP tool names to generic API tool handlers
// ABOUTME: Provides the McpTool trait, shared argument helpers, and API name resolution output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

pub mod apis;
pub mod browse;
pub mod call;
pub mod search;

use std::collections::HashMap;

use apiscout::{ApiEntry, ApiError, ApiRegistry, ResolveError};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::protocol::{CallToolResult, ToolDefinition};

/// Trait implemented by each generic tool exposed by this server
///
/// Handlers return `Ok` for both successful and tool-level error results;
/// `Err` is reserved for unexpected faults and becomes a JSON-RPC internal
/// error.
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Stable tool name used for dispatch
    fn name(&self) -> &'static str;

    /// Build the tool's definition for the registry's current shape
    ///
    /// `None` hides the tool from `tools/list`; it stays callable.
    fn definition(&self, registry: &ApiRegistry) -> Option<ToolDefinition>;

    /// Execute the tool with the given arguments
    async fn execute(
        &self,
        registry: &ApiRegistry,
        arguments: &Value,
    ) -> Result<CallToolResult, ApiError>;
}

/// Registry mapping tool names to their handler implementations
///
/// Keeps registration order so `tools/list` output is stable.
pub struct ToolRegistry {
    tools: Vec<Box<dyn McpTool>>,
    by_name: HashMap<&'static str, usize>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register a tool handler; a later tool with the same name replaces it
    pub fn register(&mut self, tool: Box<dyn McpTool>) {
        let name = tool.name();
        if let Some(&index) = self.by_name.get(name) {
            self.tools[index] = tool;
        } else {
            self.by_name.insert(name, self.tools.len());
            self.tools.push(tool);
        }
    }

    /// Tool definitions for `tools/list`, in registration order
    pub fn list_definitions(&self, registry: &ApiRegistry) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .filter_map(|t| t.definition(registry))
            .collect()
    }

    /// Dispatch a `tools/call` to the named tool handler
    pub async fn execute(
        &self,
        name: &str,
        registry: &ApiRegistry,
        arguments: &Value,
    ) -> Result<CallToolResult, ApiError> {
        match self.by_name.get(name).and_then(|&i| self.tools.get(i)) {
            Some(tool) => tool.execute(registry, arguments).await,
            None => Ok(CallToolResult::error(format!("Unknown tool: {name}"))),
        }
    }
}

/// Build the default tool registry with the five generic API tools
pub fn build_tool_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(apis::ListRegisteredApis));
    registry.register(Box::new(browse::ListApiCategories));
    registry.register(Box::new(browse::ListApiEndpoints));
    registry.register(Box::new(search::SearchApi));
    registry.register(Box::new(call::CallApi));
    registry
}

// ============================================================================
// Shared argument helpers
// ============================================================================

/// Name of the argument that selects a registered API
pub const API_ARG: &str = "api";

/// Build an object input schema, adding the `api` selector when several APIs exist
///
/// `properties` is a list of `(name, schema)` pairs in presentation order.
pub fn input_schema(registry: &ApiRegistry, properties: Vec<(&str, Value)>, required: &[&str]) -> Value {
    let mut props = Map::new();
    let mut required: Vec<&str> = required.to_vec();

    if registry.requires_api_name() {
        props.insert(
            API_ARG.to_owned(),
            json!({
                "type": "string",
                "description": format!(
                    "Registered API to target. One of: {}",
                    registry.names().join(", ")
                ),
            }),
        );
        required.insert(0, API_ARG);
    }

    for (name, schema) in properties {
        props.insert(name.to_owned(), schema);
    }

    json!({
        "type": "object",
        "properties": props,
        "required": required,
    })
}

/// Description prefix naming the single registered API, or empty
pub fn api_scope(registry: &ApiRegistry) -> String {
    match registry.entries() {
        [only] => format!(" in {}", only.display_title()),
        [] => String::new(),
        _ => " in the selected API".to_owned(),
    }
}

/// Non-blank string argument, trimmed
pub fn string_arg<'a>(arguments: &'a Value, key: &str) -> Option<&'a str> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Non-blank string argument, or a tool-level error naming it
pub fn required_string_arg<'a>(arguments: &'a Value, key: &str) -> Result<&'a str, CallToolResult> {
    string_arg(arguments, key)
        .ok_or_else(|| CallToolResult::error(format!("'{key}' parameter is required")))
}

/// Resolve the API a tool call targets, or the result to return instead
///
/// A missing name with several APIs registered is a selection prompt, not an
/// error: the agent is told which names are available.
pub fn resolve_api<'r>(registry: &'r ApiRegistry, arguments: &Value) -> Result<&'r ApiEntry, CallToolResult> {
    registry
        .resolve(string_arg(arguments, API_ARG))
        .map_err(|e| match e {
            ResolveError::Empty => CallToolResult::error(
                "No APIs are loaded. Check the server's configured API sources and its log output.".to_owned(),
            ),
            ResolveError::NameRequired => CallToolResult::text(format!(
                "Several APIs are registered. Choose one and pass it as 'api'.\n\n{}",
                api_listing(registry)
            )),
            ResolveError::NotFound(name) => {
                CallToolResult::error(format!("API not found: {name}\n\n{}", api_listing(registry)))
            }
        })
}

/// Bullet list of registered APIs with titles and endpoint counts
pub fn api_listing(registry: &ApiRegistry) -> String {
    let lines: Vec<String> = registry
        .entries()
        .iter()
        .map(|entry| {
            format!(
                "- **{}**: {} ({} endpoints)",
                entry.name(),
                entry.display_title(),
                entry.catalog().len()
            )
        })
        .collect();
    format!("Available APIs:\n{}", lines.join("\n"))
}
