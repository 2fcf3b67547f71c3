// ABOUTME: Outbound HTTP transport for backend API calls behind the HttpClient trait
// ABOUTME: Defines OutboundRequest/HttpResponse and the reqwest-based client and factory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::HttpClientConfig;
use crate::types::{ApiError, HttpMethod};

/// A fully resolved request ready to be sent to a backend API
///
/// The path is relative to the client's base URL and already has its
/// placeholders substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Resolved path (relative to the base URL)
    pub path: String,
    /// Query parameters in insertion order
    pub query: Vec<(String, String)>,
    /// Header name/value pairs in insertion order
    pub headers: Vec<(String, String)>,
    /// JSON body object, absent when no body parameters were supplied
    pub body: Option<Value>,
}

impl OutboundRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Join the base URL, path, and URL-encoded query string
    pub fn url(&self, base_url: &str) -> Result<Url, ApiError> {
        let base = base_url.trim_end_matches('/');
        let joined = if self.path.starts_with('/') {
            format!("{base}{}", self.path)
        } else {
            format!("{base}/{}", self.path)
        };

        let parsed = if self.query.is_empty() {
            Url::parse(&joined)
        } else {
            Url::parse_with_params(&joined, &self.query)
        };

        parsed.map_err(|e| ApiError::invalid_request(format!("Invalid request URL '{joined}': {e}")))
    }
}

/// Raw response returned by a backend API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code
    pub status: u16,
    /// Canonical reason phrase (may be empty)
    pub reason: String,
    /// Response body as text
    pub body: String,
}

impl fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reason.is_empty() {
            write!(f, "{}", self.status)
        } else {
            write!(f, "{} {}", self.status, self.reason)
        }
    }
}

/// Transport collaborator that performs one HTTP exchange
///
/// Non-2xx statuses are successful exchanges; only connection, timeout, and
/// similar failures are errors.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Base URL every request path is resolved against
    fn base_url(&self) -> &str;

    /// Send the request and collect the full response body
    async fn send(&self, request: &OutboundRequest) -> Result<HttpResponse, ApiError>;
}

/// Creates one HTTP client per registered API
pub trait ClientFactory: Send + Sync {
    /// Create a client bound to the given base URL
    fn create(&self, base_url: &str) -> Result<Arc<dyn HttpClient>, ApiError>;
}

// ============================================================================
// reqwest implementation
// ============================================================================

/// HTTP client backed by a pooled `reqwest::Client`
pub struct ReqwestClient {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Build a client for `base_url` with the given timeout and user agent
    pub fn new(base_url: &str, config: &HttpClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ApiError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: &OutboundRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url(&self.base_url)?;
        info!(method = %request.method, url = %url, "Outbound API request");

        let mut builder = self
            .client
            .request(reqwest_method(request.method), url.clone())
            .header(ACCEPT, "application/json");

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            debug!(body = %body, "Outbound request body");
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("{} {url}: {e}", request.method)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to read response body: {e}")))?;

        info!(status = status.as_u16(), url = %url, "API response received");

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_owned(),
            body,
        })
    }
}

/// Factory producing [`ReqwestClient`]s that share one configuration
#[derive(Debug, Clone, Default)]
pub struct ReqwestClientFactory {
    config: HttpClientConfig,
}

impl ReqwestClientFactory {
    /// Create a factory with the given client configuration
    pub const fn new(config: HttpClientConfig) -> Self {
        Self { config }
    }
}

impl ClientFactory for ReqwestClientFactory {
    fn create(&self, base_url: &str) -> Result<Arc<dyn HttpClient>, ApiError> {
        Ok(Arc::new(ReqwestClient::new(base_url, &self.config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(path: &str, query: &[(&str, &str)]) -> OutboundRequest {
        OutboundRequest {
            method: HttpMethod::Get,
            path: path.to_owned(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            headers: vec![("X-Api-Key".to_owned(), "k".to_owned())],
            body: None,
        }
    }

    #[test]
    fn url_joins_with_single_slash() {
        let url = request("/pet/42", &[]).url("http://localhost:8080/api/").expect("url");
        assert_eq!(url.as_str(), "http://localhost:8080/api/pet/42");

        let url = request("pet/42", &[]).url("http://localhost:8080/api").expect("url");
        assert_eq!(url.as_str(), "http://localhost:8080/api/pet/42");
    }

    #[test]
    fn url_encodes_query_parameters() {
        let url = request("/pet/findByStatus", &[("status", "sold out"), ("tag", "a&b")])
            .url("https://petstore.example.com")
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://petstore.example.com/pet/findByStatus?status=sold+out&tag=a%26b"
        );
    }

    #[test]
    fn relative_base_url_is_rejected() {
        let err = request("/pet", &[]).url("/api/v3").expect_err("relative base");
        assert_eq!(err.kind, crate::types::ErrorKind::InvalidRequest);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = request("/", &[]);
        assert_eq!(req.header("x-api-key"), Some("k"));
        assert_eq!(req.header("Authorization"), None);
    }

    #[test]
    fn status_line_display() {
        let resp = HttpResponse {
            status: 404,
            reason: "Not Found".to_owned(),
            body: String::new(),
        };
        assert_eq!(resp.to_string(), "404 Not Found");
    }

    #[test]
    fn factory_trims_trailing_slash() {
        let factory = ReqwestClientFactory::default();
        let client = factory.create("http://localhost:9/").expect("client");
        assert_eq!(client.base_url(), "http://localhost:9");
    }
}
