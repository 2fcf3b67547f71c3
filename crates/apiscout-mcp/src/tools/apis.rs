// ABOUTME: MCP tool listing every registered API with its title, version, and size
// ABOUTME: Advertised only when more than one API is registered
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::fmt::Write;

use apiscout::{ApiError, ApiRegistry};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::protocol::{CallToolResult, ToolDefinition};
use crate::tools::McpTool;

/// Lists the registered APIs so the agent can pick an `api` value
pub struct ListRegisteredApis;

#[async_trait]
impl McpTool for ListRegisteredApis {
    fn name(&self) -> &'static str {
        "list_registered_apis"
    }

    fn definition(&self, registry: &ApiRegistry) -> Option<ToolDefinition> {
        if !registry.requires_api_name() {
            return None;
        }

        Some(ToolDefinition {
            name: self.name().to_owned(),
            description: format!(
                "List the {} registered APIs with their titles, versions, and endpoint counts.\n\
                 Every other tool takes one of these names as its 'api' argument.",
                registry.len()
            ),
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
        })
    }

    async fn execute(
        &self,
        registry: &ApiRegistry,
        _arguments: &Value,
    ) -> Result<CallToolResult, ApiError> {
        if registry.is_empty() {
            return Ok(CallToolResult::error("No APIs are loaded".to_owned()));
        }

        let mut out = String::from("# Registered APIs\n\n");
        writeln!(out, "Total: {} APIs\n", registry.len())?;
        out.push_str("| Name | Title | Version | Endpoints | Categories |\n");
        out.push_str("|------|-------|---------|-----------|------------|\n");

        for entry in registry.entries() {
            let catalog = entry.catalog();
            writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                entry.name(),
                entry.title().unwrap_or("-"),
                entry.version().unwrap_or("-"),
                catalog.len(),
                catalog.category_count()
            )?;
        }

        out.push_str("\n*Pass a name as `api` to `list_api_categories`, `search_api`, or `call_api`.*");
        Ok(CallToolResult::text(out))
    }
}
