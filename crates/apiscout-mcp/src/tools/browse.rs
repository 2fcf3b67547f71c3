// ABOUTME: MCP tools for hierarchical browsing: category (tag) listing and per-category endpoints
// ABOUTME: Renders markdown tables and endpoint summaries from an API's endpoint catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::fmt::Write;

use apiscout::{ApiError, ApiRegistry, EndpointRecord};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::protocol::{CallToolResult, ToolDefinition};
use crate::tools::{api_scope, input_schema, required_string_arg, resolve_api, McpTool};

// ============================================================================
// list_api_categories
// ============================================================================

/// Lists an API's categories (tags) with endpoint counts
pub struct ListApiCategories;

#[async_trait]
impl McpTool for ListApiCategories {
    fn name(&self) -> &'static str {
        "list_api_categories"
    }

    fn definition(&self, registry: &ApiRegistry) -> Option<ToolDefinition> {
        Some(ToolDefinition {
            name: self.name().to_owned(),
            description: format!(
                "List all API categories (tags) available{}.\n\
                 Returns category names with endpoint counts.\n\
                 Use this first to explore the API structure.",
                api_scope(registry)
            ),
            input_schema: input_schema(registry, Vec::new(), &[]),
        })
    }

    async fn execute(
        &self,
        registry: &ApiRegistry,
        arguments: &Value,
    ) -> Result<CallToolResult, ApiError> {
        let entry = match resolve_api(registry, arguments) {
            Ok(entry) => entry,
            Err(result) => return Ok(result),
        };
        let catalog = entry.catalog();

        let mut out = String::from("# API Categories\n\n");
        writeln!(out, "**{}**\n", entry.display_title())?;
        writeln!(
            out,
            "Total: {} categories, {} endpoints\n",
            catalog.category_count(),
            catalog.len()
        )?;
        out.push_str("| Category | Endpoints |\n");
        out.push_str("|----------|-----------|\n");
        for (name, count) in catalog.categories() {
            writeln!(out, "| {name} | {count} |")?;
        }
        out.push_str("\n*Use `list_api_endpoints` with a category name to see endpoints.*");

        Ok(CallToolResult::text(out))
    }
}

// ============================================================================
// list_api_endpoints
// ============================================================================

/// Lists the endpoints of one category with their parameter names
pub struct ListApiEndpoints;

#[async_trait]
impl McpTool for ListApiEndpoints {
    fn name(&self) -> &'static str {
        "list_api_endpoints"
    }

    fn definition(&self, registry: &ApiRegistry) -> Option<ToolDefinition> {
        Some(ToolDefinition {
            name: self.name().to_owned(),
            description: format!(
                "List all API endpoints in a specific category{}.\n\
                 Returns operationId, method, path, and summary for each endpoint.\n\
                 Use call_api with the operationId to invoke an endpoint.",
                api_scope(registry)
            ),
            input_schema: input_schema(
                registry,
                vec![(
                    "category",
                    json!({
                        "type": "string",
                        "description": "Category (tag) name to list endpoints for. Use list_api_categories to get available categories."
                    }),
                )],
                &["category"],
            ),
        })
    }

    async fn execute(
        &self,
        registry: &ApiRegistry,
        arguments: &Value,
    ) -> Result<CallToolResult, ApiError> {
        let entry = match resolve_api(registry, arguments) {
            Ok(entry) => entry,
            Err(result) => return Ok(result),
        };
        let category = match required_string_arg(arguments, "category") {
            Ok(category) => category,
            Err(result) => return Ok(result),
        };

        let catalog = entry.catalog();
        let Some(listing) = catalog.by_tag(category) else {
            return Ok(CallToolResult::error(format!(
                "Category not found: {category}\nAvailable categories: {}",
                catalog.category_names().join(", ")
            )));
        };

        let mut out = format!("# Endpoints in '{}'\n\n", listing.name);
        writeln!(out, "Total: {} endpoints\n", listing.endpoints.len())?;
        for endpoint in &listing.endpoints {
            write_endpoint_summary(&mut out, endpoint)?;
        }
        out.push_str("*Use `call_api` with operationId and parameters to call an endpoint.*\n");
        out.push_str("*Use `search_api` to get full parameter details for a specific endpoint.*");

        Ok(CallToolResult::text(out))
    }
}

/// One endpoint as a markdown section with required/optional parameter names
fn write_endpoint_summary(out: &mut String, endpoint: &EndpointRecord) -> Result<(), ApiError> {
    writeln!(out, "## {}", endpoint.operation_id)?;
    writeln!(out, "- **Method:** {}", endpoint.method)?;
    writeln!(out, "- **Path:** {}", endpoint.path)?;
    if !endpoint.summary.is_empty() {
        writeln!(out, "- **Summary:** {}", endpoint.summary)?;
    }

    let required = endpoint.required_parameter_names();
    if !required.is_empty() {
        writeln!(out, "- **Required params:** {}", required.join(", "))?;
    }
    let optional = endpoint.optional_parameter_names();
    if !optional.is_empty() {
        writeln!(out, "- **Optional params:** {}", optional.join(", "))?;
    }
    out.push('\n');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{pair, single};

    #[tokio::test]
    async fn categories_table_counts_multi_tag_endpoints_twice() {
        let result = ListApiCategories
            .execute(&single(), &json!({}))
            .await
            .expect("execute");
        let text = result.first_text();
        assert!(text.contains("**Petstore (v1.0.0)**"));
        assert!(text.contains("Total: 3 categories, 4 endpoints"));
        assert!(text.contains("| pet | 3 |"));
        assert!(text.contains("| store | 1 |"));
        assert!(text.contains("| default | 1 |"));
    }

    #[tokio::test]
    async fn categories_without_api_name_prompt_for_selection() {
        let result = ListApiCategories
            .execute(&pair(), &json!({}))
            .await
            .expect("execute");
        assert!(!result.is_error());
        assert!(result.first_text().contains("**local**"));
        assert!(result.first_text().contains("**dev**"));
    }

    #[tokio::test]
    async fn endpoints_are_listed_with_parameter_names() {
        let result = ListApiEndpoints
            .execute(&single(), &json!({"category": "PET"}))
            .await
            .expect("execute");
        let text = result.first_text();
        assert!(text.starts_with("# Endpoints in 'pet'"));
        assert!(text.contains("Total: 3 endpoints"));
        assert!(text.contains("## getPetById\n- **Method:** GET\n- **Path:** /pet/{petId}"));
        assert!(text.contains("- **Required params:** name"));
        assert!(text.contains("- **Optional params:** status"));
        assert!(text.contains("## getInventory"));
    }

    #[tokio::test]
    async fn unknown_category_lists_available_ones() {
        let result = ListApiEndpoints
            .execute(&single(), &json!({"category": "users"}))
            .await
            .expect("execute");
        assert!(result.is_error());
        assert_eq!(
            result.first_text(),
            "Category not found: users\nAvailable categories: pet, store, default"
        );
    }

    #[tokio::test]
    async fn category_argument_is_required() {
        let result = ListApiEndpoints
            .execute(&single(), &json!({}))
            .await
            .expect("execute");
        assert!(result.is_error());
        assert_eq!(result.first_text(), "'category' parameter is required");
    }

    #[test]
    fn single_api_description_names_the_api() {
        let def = ListApiCategories.definition(&single()).expect("definition");
        assert!(def.description.contains("in Petstore (v1.0.0)"));
        assert!(def.input_schema["properties"].get("api").is_none());
    }
}
