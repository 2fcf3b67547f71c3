// ABOUTME: MCP tool invoking any catalogued operation by operationId with named arguments
// ABOUTME: Delegates to the library CallDispatcher and maps its outcome to a tool result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use apiscout::{ApiError, ApiRegistry, CallDispatcher};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::protocol::{CallToolResult, ToolDefinition};
use crate::tools::{api_scope, input_schema, required_string_arg, resolve_api, McpTool};

/// Calls an endpoint; every failure short of a protocol fault is a tool error
pub struct CallApi;

#[async_trait]
impl McpTool for CallApi {
    fn name(&self) -> &'static str {
        "call_api"
    }

    fn definition(&self, registry: &ApiRegistry) -> Option<ToolDefinition> {
        Some(ToolDefinition {
            name: self.name().to_owned(),
            description: format!(
                "Call an API endpoint{} by its operationId.\n\
                 First use list_api_endpoints or search_api to find the operationId and required parameters.\n\
                 Pass parameters as a JSON object with parameter names as keys.",
                api_scope(registry)
            ),
            input_schema: input_schema(
                registry,
                vec![
                    (
                        "operationId",
                        json!({
                            "type": "string",
                            "description": "The operationId of the API to call. Get this from list_api_endpoints or search_api."
                        }),
                    ),
                    (
                        "parameters",
                        json!({
                            "type": "object",
                            "description": "Parameters for the API call as a JSON object. Include path, query, header, and body parameters as needed."
                        }),
                    ),
                    (
                        "headers",
                        json!({
                            "type": "object",
                            "description": "Extra HTTP headers to send, as a JSON object. An Authorization header here replaces the configured credential."
                        }),
                    ),
                ],
                &["operationId"],
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
        let operation_id = match required_string_arg(arguments, "operationId") {
            Ok(id) => id,
            Err(result) => return Ok(result),
        };

        let outcome = CallDispatcher::new(entry)
            .call(
                operation_id,
                arguments.get("parameters"),
                arguments.get("headers"),
            )
            .await;

        Ok(match outcome {
            Ok(text) => CallToolResult::text(text),
            Err(e) => CallToolResult::error(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use apiscout::HttpMethod;

    use super::*;
    use crate::tools::test_support::{petstore, CountingClient};

    #[tokio::test]
    async fn calls_the_resolved_endpoint() {
        let client = CountingClient::new(r#"{"id":42,"name":"Rex"}"#);
        let registry = ApiRegistry::new(vec![petstore("petstore", client.clone())]);

        let result = CallApi
            .execute(
                &registry,
                &json!({"operationId": "getPetById", "parameters": {"petId": "42"}}),
            )
            .await
            .expect("execute");

        assert!(!result.is_error());
        assert!(result.first_text().starts_with("=== HTTP Response ==="));
        assert!(result.first_text().contains("\"name\": \"Rex\""));

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, HttpMethod::Get);
        assert_eq!(calls[0].path, "/pet/42");
    }

    #[tokio::test]
    async fn missing_parameters_never_reach_the_client() {
        let client = CountingClient::new("{}");
        let registry = ApiRegistry::new(vec![petstore("petstore", client.clone())]);

        let result = CallApi
            .execute(&registry, &json!({"operationId": "addPet", "parameters": {"status": "sold"}}))
            .await
            .expect("execute");

        assert!(result.is_error());
        assert!(result
            .first_text()
            .starts_with("Missing required parameters: name (body)"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn targets_the_named_api_among_several() {
        let local = CountingClient::new("{}");
        let dev = CountingClient::new("{}");
        let registry = ApiRegistry::new(vec![
            petstore("Local", local.clone()),
            petstore("dev", dev.clone()),
        ]);

        let result = CallApi
            .execute(&registry, &json!({"api": "local", "operationId": "getInventory"}))
            .await
            .expect("execute");

        assert!(!result.is_error());
        assert_eq!(local.calls().len(), 1);
        assert!(dev.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_operation_points_to_discovery_tools() {
        let registry = ApiRegistry::new(vec![petstore("petstore", CountingClient::new("{}"))]);
        let result = CallApi
            .execute(&registry, &json!({"operationId": "deletePet"}))
            .await
            .expect("execute");
        assert!(result.is_error());
        assert!(result.first_text().starts_with("Endpoint not found: deletePet"));
    }

    #[tokio::test]
    async fn operation_id_is_required() {
        let registry = ApiRegistry::new(vec![petstore("petstore", CountingClient::new("{}"))]);
        let result = CallApi.execute(&registry, &json!({})).await.expect("execute");
        assert!(result.is_error());
        assert_eq!(result.first_text(), "'operationId' parameter is required");
    }
}
