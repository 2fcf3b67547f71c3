// ABOUTME: Startup configuration for registered backend APIs and the outbound HTTP client
// ABOUTME: Defines ApiSource, HttpClientConfig, name=value list parsing, and optional TOML files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::num::ParseIntError;
use std::time::Duration;

use serde::Deserialize;

use crate::types::ApiError;

/// Default timeout for outbound API calls (30 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Name used when a single API is registered without an explicit name
pub const DEFAULT_API_NAME: &str = "default";

/// One backend API to register at startup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiSource {
    /// Registry key chosen by the operator (case-insensitive unique)
    pub name: String,
    /// Interface document reference (URL or file path)
    pub source: String,
    /// Base URL override; takes precedence over the document's declared server
    #[serde(default)]
    pub base_url: Option<String>,
    /// Fixed Authorization header value injected into every call
    #[serde(default)]
    pub auth: Option<String>,
}

impl ApiSource {
    /// Create a source with no override and no credential
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            base_url: None,
            auth: None,
        }
    }

    /// Set the base URL override
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the fixed Authorization credential
    #[must_use]
    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }
}

/// Settings shared by every outbound HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-request timeout (connect + read + write)
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("apiscout/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Set the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Split a `name=value` pair at the first `=`
///
/// Both sides are trimmed; an empty name or value is rejected.
pub fn parse_named_value(input: &str) -> Result<(String, String), ApiError> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| ApiError::config(format!("Expected NAME=VALUE, got: {input}")))?;

    let name = name.trim();
    let value = value.trim();
    if name.is_empty() || value.is_empty() {
        return Err(ApiError::config(format!(
            "Expected NAME=VALUE with both sides non-empty, got: {input}"
        )));
    }

    Ok((name.to_owned(), value.to_owned()))
}

/// Parse a timeout value from a string (in seconds)
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a `u64`.
pub fn parse_timeout(input: &str) -> Result<Duration, ParseIntError> {
    input.trim().parse::<u64>().map(Duration::from_secs)
}

/// Apply per-name credentials and base URL overrides to a source list
///
/// Names are matched case-insensitively; entries naming an unknown API are
/// reported as a config error so typos do not silently drop a credential.
pub fn apply_overrides(
    sources: &mut [ApiSource],
    auth: &[(String, String)],
    base_urls: &[(String, String)],
) -> Result<(), ApiError> {
    for (name, credential) in auth {
        let source = find_source(sources, name)?;
        source.auth = Some(credential.clone());
    }
    for (name, url) in base_urls {
        let source = find_source(sources, name)?;
        source.base_url = Some(url.clone());
    }
    Ok(())
}

fn find_source<'a>(sources: &'a mut [ApiSource], name: &str) -> Result<&'a mut ApiSource, ApiError> {
    sources
        .iter_mut()
        .find(|s| s.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ApiError::config(format!("Override refers to unknown API: {name}")))
}

// ============================================================================
// Config File (feature = "config-file")
// ============================================================================

/// Contents of a TOML configuration file
///
/// ```toml
/// timeout_secs = 60
///
/// [[api]]
/// name = "petstore"
/// source = "https://petstore3.swagger.io/api/v3/openapi.json"
/// auth = "Bearer abc123"
/// ```
#[cfg(feature = "config-file")]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// Registered APIs in file order
    #[serde(default, rename = "api")]
    pub apis: Vec<ApiSource>,
    /// Optional outbound request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[cfg(feature = "config-file")]
impl FileConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ApiError> {
        toml::from_str(text).map_err(|e| ApiError::config(format!("Invalid config file: {e}")))
    }

    /// Read and parse a configuration file
    pub async fn load(path: &std::path::Path) -> Result<Self, ApiError> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            ApiError::config(format!("Cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    /// Default location: `<config dir>/apiscout/config.toml`
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("apiscout").join("config.toml"))
    }
}
