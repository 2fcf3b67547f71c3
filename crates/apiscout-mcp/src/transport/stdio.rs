// ABOUTME: Line-delimited JSON-RPC transport over stdin/stdout or any async byte stream pair
// ABOUTME: Reads one message per line, answers in order, and flushes after every response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::sync::Arc;

use apiscout::ApiError;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::protocol::{JsonRpcRequest, JsonRpcResponse, INVALID_REQUEST, PARSE_ERROR};
use crate::server::McpServer;
use crate::transport::McpTransport;

/// MCP transport using newline-delimited JSON-RPC
///
/// Each input line is one complete message. Responses are written as single
/// lines. With [`StdioTransport::stdio`] logs must go to stderr to keep the
/// protocol channel clean.
pub struct StdioTransport<R, W> {
    reader: R,
    writer: W,
}

impl StdioTransport<BufReader<Stdin>, Stdout> {
    /// Transport over the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> StdioTransport<R, W> {
    /// Transport over an arbitrary buffered reader and writer
    pub const fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

#[async_trait]
impl<R, W> McpTransport for StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn serve(mut self, server: Arc<McpServer>) -> Result<(), ApiError> {
        let mut line = Vec::new();
        debug!("Transport ready, waiting for JSON-RPC messages");

        loop {
            line.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut line)
                .await
                .map_err(|e| ApiError::internal(format!("input read failed: {e}")))?;
            if read == 0 {
                break;
            }

            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let request = match decode_message(&line) {
                Ok(req) => req,
                Err(Some(resp)) => {
                    write_response(&mut self.writer, &resp).await?;
                    continue;
                }
                Err(None) => continue,
            };

            debug!(method = %request.method, "Handling MCP request");

            if let Some(response) = server.handle_request(request).await {
                write_response(&mut self.writer, &response).await?;
            }
        }

        debug!("Input closed, shutting down transport");
        Ok(())
    }
}

/// Decode one line into a request
///
/// Invalid JSON gets a parse error with a null id. Valid JSON that is not a
/// well-formed request gets an invalid-request error carrying its id, or no
/// reply at all when it has none.
fn decode_message(line: &[u8]) -> Result<JsonRpcRequest, Option<JsonRpcResponse>> {
    let value: Value = serde_json::from_slice(line).map_err(|e| {
        error!(error = %e, "Failed to parse JSON-RPC request");
        Some(JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}")))
    })?;

    let id = match &value {
        Value::Object(obj) => obj.get("id").filter(|id| !id.is_null()).cloned(),
        _ => {
            warn!("JSON-RPC message is not an object");
            return Err(Some(JsonRpcResponse::error(
                None,
                INVALID_REQUEST,
                "Invalid request: expected a JSON object".to_owned(),
            )));
        }
    };

    serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, id = ?id, "Malformed JSON-RPC request");
        id.map(|id| JsonRpcResponse::error(Some(id), INVALID_REQUEST, format!("Invalid request: {e}")))
    })
}

/// Serialize and write a JSON-RPC response as a single line, then flush
async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> Result<(), ApiError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut json = serde_json::to_vec(response)
        .map_err(|e| ApiError::internal(format!("JSON serialization failed: {e}")))?;
    json.push(b'\n');

    writer
        .write_all(&json)
        .await
        .map_err(|e| ApiError::internal(format!("output write failed: {e}")))?;

    writer
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("output flush failed: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::build_tool_registry;
    use crate::tools::test_support::single;

    async fn run(input: &[u8]) -> Vec<Value> {
        let server = Arc::new(McpServer::new(Arc::new(single()), build_tool_registry()));
        let mut output = Vec::new();
        StdioTransport::new(input, &mut output)
            .serve(server)
            .await
            .expect("serve");
        String::from_utf8(output)
            .expect("utf8")
            .lines()
            .map(|l| serde_json::from_str(l).expect("response json"))
            .collect()
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        assert!(run(b"\n   \n\r\n").await.is_empty());
    }

    #[tokio::test]
    async fn malformed_lines_get_null_id_parse_errors() {
        let responses = run(b"{not json\n\xff\xfe\n").await;
        assert_eq!(responses.len(), 2);
        for resp in responses {
            assert!(resp["id"].is_null());
            assert_eq!(resp["error"]["code"], PARSE_ERROR);
        }
    }

    #[tokio::test]
    async fn malformed_requests_keep_their_id() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":7}"#, "\n",
            r#"{"jsonrpc":"2.0","id":8,"method":42}"#, "\n",
            r#"[1,2]"#, "\n",
        );
        let responses = run(input.as_bytes()).await;
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["id"], 7);
        assert_eq!(responses[0]["error"]["code"], INVALID_REQUEST);
        assert_eq!(responses[1]["id"], 8);
        assert_eq!(responses[1]["error"]["code"], INVALID_REQUEST);
        assert!(responses[2]["id"].is_null());
        assert_eq!(responses[2]["error"]["code"], INVALID_REQUEST);
    }

    #[tokio::test]
    async fn malformed_messages_without_id_are_silent() {
        let input = concat!(
            r#"{"jsonrpc":"2.0"}"#, "\n",
            r#"{"jsonrpc":"2.0","id":null,"method":["x"]}"#, "\n",
        );
        assert!(run(input.as_bytes()).await.is_empty());
    }

    #[tokio::test]
    async fn responses_follow_request_order() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#, "\n",
            r#"{"jsonrpc":"2.0","method":"initialized"}"#, "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#, "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#,
        );
        let responses = run(input.as_bytes()).await;
        let ids: Vec<i64> = responses.iter().filter_map(|r| r["id"].as_i64()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
