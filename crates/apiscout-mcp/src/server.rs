// ABOUTME: MCP server core routing JSON-RPC messages to protocol handlers and generic tools
// ABOUTME: Resolves method names through a table built once and applies notification rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::collections::HashMap;

use apiscout::SharedRegistry;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::protocol::{
    CallToolParams, InitializeParams, InitializeResult, JsonRpcRequest, JsonRpcResponse,
    ToolsListResult, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION,
    METHOD_NOT_FOUND,
};
use crate::tools::ToolRegistry;

/// Protocol methods the server understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Initialize,
    /// Handshake acknowledgement; never answered, even when it carries an id
    Initialized,
    ToolsList,
    ToolsCall,
    Ping,
}

/// Method names and their handlers
const METHODS: [(&str, Method); 6] = [
    ("initialize", Method::Initialize),
    ("initialized", Method::Initialized),
    ("notifications/initialized", Method::Initialized),
    ("tools/list", Method::ToolsList),
    ("tools/call", Method::ToolsCall),
    ("ping", Method::Ping),
];

/// MCP server that dispatches JSON-RPC requests to the appropriate handler
///
/// Owns the immutable API registry and the tool registry. Transport layers
/// feed decoded requests into `handle_request` and write the returned
/// responses, one at a time and in arrival order.
pub struct McpServer {
    registry: SharedRegistry,
    tools: ToolRegistry,
    methods: HashMap<&'static str, Method>,
}

impl McpServer {
    /// Create a server over the given API registry and tool registry
    pub fn new(registry: SharedRegistry, tools: ToolRegistry) -> Self {
        Self {
            registry,
            tools,
            methods: METHODS.into_iter().collect(),
        }
    }

    /// Route a JSON-RPC message to the appropriate MCP handler
    ///
    /// Returns `None` for notifications (messages without an id) and for the
    /// `initialized` acknowledgement.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let method = self.methods.get(request.method.as_str()).copied();

        if method == Some(Method::Initialized) {
            debug!(method = %request.method, "Client finished initialization");
            return None;
        }

        let Some(id) = request.id else {
            debug!(method = %request.method, "Received notification, no response");
            return None;
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                Some(id),
                INVALID_REQUEST,
                format!("Unsupported JSON-RPC version: {}", request.jsonrpc),
            ));
        }

        let Some(method) = method else {
            warn!(method = %request.method, "Unknown MCP method");
            return Some(JsonRpcResponse::error(
                Some(id),
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ));
        };

        let id = Some(id);
        let response = match method {
            Method::Initialize => Self::handle_initialize(id, request.params),
            Method::ToolsList => self.handle_tools_list(id),
            Method::ToolsCall => self.handle_tools_call(id, request.params).await,
            Method::Ping => JsonRpcResponse::success(id, Value::Object(Map::new())),
            Method::Initialized => return None,
        };

        Some(response)
    }

    /// Handle `initialize`: log client info and return server capabilities
    fn handle_initialize(id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        if let Some(init) = params.and_then(|p| serde_json::from_value::<InitializeParams>(p).ok()) {
            info!(
                client = init.client_info.as_ref().map_or("unknown", |c| c.name.as_str()),
                client_version = ?init.client_info.as_ref().and_then(|c| c.version.as_deref()),
                protocol = ?init.protocol_version,
                "MCP client connected"
            );
        }

        to_response(id, &InitializeResult::default())
    }

    /// Handle `tools/list`: tool definitions for the registry's current shape
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: self.tools.list_definitions(&self.registry),
        };
        to_response(id, &result)
    }

    /// Handle `tools/call`: dispatch to the named tool handler
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                "Missing params for tools/call".to_owned(),
            );
        };

        let call_params: CallToolParams = match serde_json::from_value(params) {
            Ok(cp) => cp,
            Err(e) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {e}"));
            }
        };

        let arguments = call_params
            .arguments
            .unwrap_or_else(|| Value::Object(Map::new()));

        debug!(tool = %call_params.name, "Executing tool");

        match self
            .tools
            .execute(&call_params.name, &self.registry, &arguments)
            .await
        {
            Ok(result) => to_response(id, &result),
            Err(e) => {
                warn!(tool = %call_params.name, error = %e, "Tool handler failed");
                JsonRpcResponse::error(id, INTERNAL_ERROR, e.message)
            }
        }
    }
}

/// Serialize a result payload, mapping serialization failure to an internal error
fn to_response<T: Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(val) => JsonRpcResponse::success(id, val),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Serialization error: {e}")),
    }
}
