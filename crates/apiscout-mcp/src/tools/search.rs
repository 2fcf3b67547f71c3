// ABOUTME: MCP tool for keyword search across an API's operations
// ABOUTME: Returns matching endpoints with full parameter tables, capped at a bounded limit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::fmt::Write;

use apiscout::catalog::{effective_search_limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use apiscout::{ApiError, ApiRegistry, EndpointRecord};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::protocol::{CallToolResult, ToolDefinition};
use crate::tools::{api_scope, input_schema, required_string_arg, resolve_api, McpTool};

/// Searches operationIds, paths, summaries, descriptions, and tags
pub struct SearchApi;

#[async_trait]
impl McpTool for SearchApi {
    fn name(&self) -> &'static str {
        "search_api"
    }

    fn definition(&self, registry: &ApiRegistry) -> Option<ToolDefinition> {
        Some(ToolDefinition {
            name: self.name().to_owned(),
            description: format!(
                "Search for API endpoints by keyword{}.\n\
                 Searches in paths, operationIds, summaries, descriptions, and tags.\n\
                 Returns matching endpoints with full details including parameters.",
                api_scope(registry)
            ),
            input_schema: input_schema(
                registry,
                vec![
                    (
                        "keyword",
                        json!({
                            "type": "string",
                            "description": "Keyword to search for in API paths, operationIds, summaries, and descriptions"
                        }),
                    ),
                    (
                        "limit",
                        json!({
                            "type": "integer",
                            "description": format!(
                                "Maximum number of results to return (default: {DEFAULT_SEARCH_LIMIT}, max: {MAX_SEARCH_LIMIT})"
                            )
                        }),
                    ),
                ],
                &["keyword"],
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
        let keyword = match required_string_arg(arguments, "keyword") {
            Ok(keyword) => keyword,
            Err(result) => return Ok(result),
        };

        let limit = effective_search_limit(arguments.get("limit").and_then(Value::as_i64));
        let matches = entry.catalog().search(keyword, limit);

        if matches.is_empty() {
            return Ok(CallToolResult::text(format!(
                "No endpoints found matching '{keyword}'.\n\
                 Try different keywords or use list_api_categories to browse."
            )));
        }

        let mut out = format!("# Search Results for '{keyword}'\n\n");
        writeln!(out, "Found {} endpoints (showing max {limit})\n", matches.len())?;
        for endpoint in matches {
            write_endpoint_details(&mut out, endpoint)?;
            out.push_str("\n---\n\n");
        }

        Ok(CallToolResult::text(out))
    }
}

/// Full endpoint description with a parameter table
fn write_endpoint_details(out: &mut String, endpoint: &EndpointRecord) -> Result<(), ApiError> {
    writeln!(out, "## {}", endpoint.operation_id)?;
    writeln!(out, "**{}** `{}`\n", endpoint.method, endpoint.path)?;

    if !endpoint.summary.is_empty() {
        writeln!(out, "{}\n", endpoint.summary)?;
    }
    if !endpoint.description.is_empty() && endpoint.description != endpoint.summary {
        writeln!(out, "{}\n", endpoint.description)?;
    }
    if !endpoint.tags.is_empty() {
        writeln!(out, "**Tags:** {}\n", endpoint.tags.join(", "))?;
    }

    if endpoint.parameters.is_empty() {
        out.push_str("**Parameters:** None\n");
        return Ok(());
    }

    out.push_str("**Parameters:**\n\n");
    out.push_str("| Name | Location | Type | Required | Description |\n");
    out.push_str("|------|----------|------|----------|-------------|\n");
    for param in &endpoint.parameters {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            param.name,
            param.location,
            param.declared_type,
            if param.required { "Yes" } else { "No" },
            param.description.replace('\n', " ")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use apiscout::{ApiEntry, EndpointCatalog, HttpMethod};

    use super::*;
    use crate::tools::test_support::{single, CountingClient};

    fn many(count: usize) -> ApiRegistry {
        let endpoints = (0..count)
            .map(|i| EndpointRecord::new(format!("listItems{i}"), HttpMethod::Get, format!("/items/{i}")))
            .collect();
        ApiRegistry::new(vec![ApiEntry::new(
            "items",
            EndpointCatalog::new(endpoints),
            CountingClient::new("{}"),
        )])
    }

    async fn found(registry: &ApiRegistry, arguments: Value) -> usize {
        let result = SearchApi.execute(registry, &arguments).await.expect("execute");
        result.first_text().matches("\n---\n").count()
    }

    #[tokio::test]
    async fn limit_is_clamped_and_reported() {
        let result = SearchApi
            .execute(&single(), &json!({"keyword": "pet", "limit": 100}))
            .await
            .expect("execute");
        let text = result.first_text();
        assert!(text.starts_with("# Search Results for 'pet'"));
        assert!(text.contains("Found 3 endpoints (showing max 50)"));
        assert_eq!(text.matches("\n---\n").count(), 3);
    }

    #[tokio::test]
    async fn default_and_maximum_limits() {
        let registry = many(60);
        assert_eq!(found(&registry, json!({"keyword": "items"})).await, 10);
        assert_eq!(found(&registry, json!({"keyword": "items", "limit": "20"})).await, 10);
        assert_eq!(found(&registry, json!({"keyword": "items", "limit": 2.5})).await, 10);
        assert_eq!(found(&registry, json!({"keyword": "items", "limit": 0})).await, 10);
        assert_eq!(found(&registry, json!({"keyword": "items", "limit": 3})).await, 3);
        assert_eq!(found(&registry, json!({"keyword": "items", "limit": 500})).await, 50);
    }

    #[tokio::test]
    async fn details_include_parameter_table() {
        let result = SearchApi
            .execute(&single(), &json!({"keyword": "getPetById"}))
            .await
            .expect("execute");
        let text = result.first_text();
        assert!(text.contains("**GET** `/pet/{petId}`"));
        assert!(text.contains("**Tags:** pet"));
        assert!(text.contains("| petId | path | integer | Yes | ID of pet to return |"));
    }

    #[tokio::test]
    async fn no_match_is_not_an_error() {
        let result = SearchApi
            .execute(&single(), &json!({"keyword": "invoice"}))
            .await
            .expect("execute");
        assert!(!result.is_error());
        assert!(result.first_text().starts_with("No endpoints found matching 'invoice'"));
    }

    #[tokio::test]
    async fn parameterless_endpoint_says_none() {
        let result = SearchApi
            .execute(&single(), &json!({"keyword": "/health"}))
            .await
            .expect("execute");
        assert!(result.first_text().contains("**Parameters:** None"));
    }
}
