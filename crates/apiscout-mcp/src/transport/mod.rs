// ABOUTME: Transport abstraction for MCP server communication channels
// ABOUTME: Defines the McpTransport trait implemented by the line-delimited stream transport
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

pub mod stdio;

use std::sync::Arc;

use apiscout::ApiError;
use async_trait::async_trait;

use crate::server::McpServer;

/// Transport layer for MCP JSON-RPC message exchange
///
/// Implementations handle the mechanics of reading requests and writing
/// responses over a specific channel.
#[async_trait]
pub trait McpTransport: Send {
    /// Start serving MCP requests, returning when the input stream closes
    async fn serve(self, server: Arc<McpServer>) -> Result<(), ApiError>;
}
