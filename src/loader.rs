// ABOUTME: Interface document loading from HTTP(S) URLs or local files
// ABOUTME: Defines the SpecLoader trait and the default reqwest/filesystem DocumentLoader
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::config::HttpClientConfig;
use crate::openapi::parse_document;
use crate::types::{ApiError, ParsedSpec};

/// Document parser collaborator: source reference in, endpoint records out
#[async_trait]
pub trait SpecLoader: Send + Sync {
    /// Fetch and parse the document at `source`
    async fn load(&self, source: &str) -> Result<ParsedSpec, ApiError>;
}

/// Loads documents over HTTP(S) or from disk and parses them as OpenAPI/Swagger
///
/// `http://` and `https://` references are fetched; `file://` references and
/// anything else are treated as filesystem paths.
pub struct DocumentLoader {
    client: reqwest::Client,
}

impl DocumentLoader {
    /// Create a loader whose HTTP fetches use the given timeout and user agent
    pub fn new(config: &HttpClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ApiError::config(format!("Failed to build document HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Read the raw document text
    async fn fetch(&self, source: &str) -> Result<String, ApiError> {
        if is_http(source) {
            debug!(source, "Fetching interface document over HTTP");
            let response = self
                .client
                .get(source)
                .header(ACCEPT, "application/json, application/yaml;q=0.9, */*;q=0.8")
                .send()
                .await
                .map_err(|e| ApiError::document(source, format!("fetch failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ApiError::document(source, format!("fetch returned HTTP {status}")));
            }

            return response
                .text()
                .await
                .map_err(|e| ApiError::document(source, format!("failed to read body: {e}")));
        }

        let path = source.strip_prefix("file://").unwrap_or(source);
        debug!(path, "Reading interface document from disk");
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ApiError::document(source, format!("cannot read file: {e}")))
    }
}

#[async_trait]
impl SpecLoader for DocumentLoader {
    async fn load(&self, source: &str) -> Result<ParsedSpec, ApiError> {
        let text = self.fetch(source).await?;
        parse_document(source, &text)
    }
}

fn is_http(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
