// ABOUTME: MCP server library exposing registered REST APIs through five generic tools
// ABOUTME: Re-exports the protocol types, server core, tool registry, and stream transport
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

//! # apiscout-mcp
//!
//! Model Context Protocol front end for [`apiscout`]. A [`McpServer`] owns an
//! immutable [`apiscout::ApiRegistry`] and a [`ToolRegistry`]; a transport
//! feeds it one JSON-RPC message at a time and writes back at most one
//! response per request.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use apiscout::ApiRegistry;
//! use apiscout_mcp::{build_tool_registry, McpServer, McpTransport, StdioTransport};
//!
//! # async fn example(registry: ApiRegistry) -> Result<(), apiscout::ApiError> {
//! let server = Arc::new(McpServer::new(Arc::new(registry), build_tool_registry()));
//! StdioTransport::stdio().serve(server).await
//! # }
//! ```

/// JSON-RPC 2.0 and MCP wire types
pub mod protocol;
/// Method routing and notification handling
pub mod server;
/// The generic API tools and their registry
pub mod tools;
/// Line-delimited stream transport
pub mod transport;

pub use server::McpServer;
pub use tools::{build_tool_registry, McpTool, ToolRegistry};
pub use transport::stdio::StdioTransport;
pub use transport::McpTransport;
