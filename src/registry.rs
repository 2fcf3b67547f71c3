// ABOUTME: Named collection of backend APIs with their catalogs, credentials, and HTTP clients
// ABOUTME: Built once at startup; resolves caller-supplied API names case-insensitively
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::{match_name, EndpointCatalog};
use crate::config::ApiSource;
use crate::http::{ClientFactory, HttpClient};
use crate::loader::SpecLoader;
use crate::types::ApiError;

/// Type alias for the registry handle shared by the server and its tools
pub type SharedRegistry = Arc<ApiRegistry>;

/// One registered backend API
pub struct ApiEntry {
    name: String,
    source: String,
    title: Option<String>,
    version: Option<String>,
    catalog: EndpointCatalog,
    auth: Option<String>,
    client: Arc<dyn HttpClient>,
}

impl ApiEntry {
    /// Create an entry whose base URL is the one the client is bound to
    pub fn new(name: impl Into<String>, catalog: EndpointCatalog, client: Arc<dyn HttpClient>) -> Self {
        Self {
            name: name.into(),
            source: String::new(),
            title: None,
            version: None,
            catalog,
            auth: None,
            client,
        }
    }

    /// Record the interface document reference
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the display title and version
    #[must_use]
    pub fn with_info(mut self, title: Option<String>, version: Option<String>) -> Self {
        self.title = title;
        self.version = version;
        self
    }

    /// Set the fixed Authorization credential
    #[must_use]
    pub fn with_auth(mut self, auth: Option<String>) -> Self {
        self.auth = auth;
        self
    }

    /// Registry key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interface document reference
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Resolved base URL
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Display title from the document, if any
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Display version from the document, if any
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// `Title (vVersion)` with placeholders for missing parts
    pub fn display_title(&self) -> String {
        format!(
            "{} (v{})",
            self.title.as_deref().unwrap_or(&self.name),
            self.version.as_deref().unwrap_or("?")
        )
    }

    /// The endpoint catalog
    pub const fn catalog(&self) -> &EndpointCatalog {
        &self.catalog
    }

    /// Fixed Authorization credential, if configured
    pub fn auth(&self) -> Option<&str> {
        self.auth.as_deref()
    }

    /// HTTP client bound to this API's base URL
    pub fn client(&self) -> &Arc<dyn HttpClient> {
        &self.client
    }
}

impl fmt::Debug for ApiEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiEntry")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("base_url", &self.base_url())
            .field("endpoints", &self.catalog.len())
            .field("auth", &self.auth.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

/// Why an API name did not resolve to an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The registry holds no APIs at all
    Empty,
    /// Several APIs are registered and no name was supplied
    NameRequired,
    /// No registered API matches the supplied name
    NotFound(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "No APIs are loaded"),
            Self::NameRequired => write!(f, "Several APIs are registered; choose one with 'api'"),
            Self::NotFound(name) => write!(f, "API not found: {name}"),
        }
    }
}

/// Ordered, immutable collection of registered APIs
#[derive(Debug, Default)]
pub struct ApiRegistry {
    entries: Vec<ApiEntry>,
}

impl ApiRegistry {
    /// Create a registry from ready-made entries
    ///
    /// Later entries whose name case-insensitively duplicates an earlier one
    /// are dropped.
    pub fn new(entries: Vec<ApiEntry>) -> Self {
        let mut registry = Self::default();
        for entry in entries {
            registry.insert(entry);
        }
        registry
    }

    fn insert(&mut self, entry: ApiEntry) -> bool {
        if self.entries.iter().any(|e| e.name.eq_ignore_ascii_case(&entry.name)) {
            warn!(api = %entry.name, "Duplicate API name, keeping the first registration");
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Load every configured API, skipping (and logging) those that fail
    ///
    /// Never fails as a whole: a registry with zero entries is returned when
    /// every source fails.
    pub async fn load(
        sources: &[ApiSource],
        loader: &dyn SpecLoader,
        factory: &dyn ClientFactory,
    ) -> Self {
        let mut registry = Self::default();

        for source in sources {
            if registry.get(&source.name).is_some() {
                warn!(api = %source.name, "Duplicate API name, skipping");
                continue;
            }

            match load_entry(source, loader, factory).await {
                Ok(entry) => {
                    info!(
                        api = %entry.name(),
                        base_url = %entry.base_url(),
                        endpoints = entry.catalog().len(),
                        categories = entry.catalog().category_count(),
                        "Registered API"
                    );
                    registry.insert(entry);
                }
                Err(e) => {
                    warn!(api = %source.name, source = %source.source, error = %e, "Failed to load API, skipping");
                }
            }
        }

        if registry.is_empty() {
            warn!("No APIs could be loaded; serving an empty tool set");
        }

        registry
    }

    /// Registered entries in registration order
    pub fn entries(&self) -> &[ApiEntry] {
        &self.entries
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Number of registered APIs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no API is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether callers must name the API they mean
    pub fn requires_api_name(&self) -> bool {
        self.entries.len() > 1
    }

    /// Look up an entry by name (exact, then case-insensitive)
    pub fn get(&self, name: &str) -> Option<&ApiEntry> {
        match_name(&self.entries, name, |e| e.name.as_str())
    }

    /// Resolve the API a tool call targets
    ///
    /// With exactly one entry the supplied name is ignored. With more, a
    /// non-empty name is required.
    pub fn resolve(&self, name: Option<&str>) -> Result<&ApiEntry, ResolveError> {
        match self.entries.as_slice() {
            [] => Err(ResolveError::Empty),
            [only] => Ok(only),
            _ => {
                let name = name.map(str::trim).filter(|n| !n.is_empty());
                let Some(name) = name else {
                    return Err(ResolveError::NameRequired);
                };
                self.get(name)
                    .ok_or_else(|| ResolveError::NotFound(name.to_owned()))
            }
        }
    }
}

async fn load_entry(
    source: &ApiSource,
    loader: &dyn SpecLoader,
    factory: &dyn ClientFactory,
) -> Result<ApiEntry, ApiError> {
    let parsed = loader.load(&source.source).await?;

    let base_url = source
        .base_url
        .clone()
        .unwrap_or(parsed.base_url);
    if base_url.trim().is_empty() {
        return Err(ApiError::config(format!(
            "No base URL for API '{}': the document declares none and no override was given",
            source.name
        )));
    }

    let client = factory.create(&base_url)?;

    Ok(ApiEntry::new(&source.name, EndpointCatalog::new(parsed.endpoints), client)
        .with_source(&source.source)
        .with_info(parsed.title, parsed.version)
        .with_auth(source.auth.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{entry, RecordingClient, StaticFactory, StaticLoader};
    use crate::types::{EndpointRecord, HttpMethod, ParsedSpec};

    fn spec(base_url: &str) -> ParsedSpec {
        ParsedSpec {
            endpoints: vec![EndpointRecord::new("ping", HttpMethod::Get, "/ping")],
            base_url: base_url.to_owned(),
            title: Some("Pinger".to_owned()),
            version: Some("3".to_owned()),
        }
    }

    #[test]
    fn single_entry_ignores_supplied_name() {
        let registry = ApiRegistry::new(vec![entry("local", vec![])]);
        assert_eq!(registry.resolve(None).map(ApiEntry::name), Ok("local"));
        assert_eq!(registry.resolve(Some("whatever")).map(ApiEntry::name), Ok("local"));
        assert!(!registry.requires_api_name());
    }

    #[test]
    fn multiple_entries_require_a_name() {
        let registry = ApiRegistry::new(vec![entry("local", vec![]), entry("dev", vec![])]);
        assert_eq!(registry.resolve(None).map(ApiEntry::name), Err(ResolveError::NameRequired));
        assert_eq!(registry.resolve(Some("  ")).map(ApiEntry::name), Err(ResolveError::NameRequired));
        assert_eq!(
            registry.resolve(Some("prod")).map(ApiEntry::name),
            Err(ResolveError::NotFound("prod".to_owned()))
        );
    }

    #[test]
    fn resolution_is_case_insensitive() {
        let registry = ApiRegistry::new(vec![entry("Local", vec![]), entry("dev", vec![])]);
        let exact = registry.resolve(Some("Local")).expect("exact");
        let folded = registry.resolve(Some("local")).expect("folded");
        assert!(std::ptr::eq(exact, folded));
    }

    #[test]
    fn empty_registry_resolves_to_empty_error() {
        let registry = ApiRegistry::default();
        assert_eq!(registry.resolve(Some("x")).map(ApiEntry::name), Err(ResolveError::Empty));
    }

    #[test]
    fn duplicate_names_keep_first() {
        let registry = ApiRegistry::new(vec![entry("local", vec![]), entry("LOCAL", vec![])]);
        assert_eq!(registry.names(), vec!["local"]);
    }

    #[tokio::test]
    async fn load_skips_failures_and_applies_overrides() {
        let loader = StaticLoader::new()
            .with_spec("http://a/v3/api-docs", spec("http://a"))
            .with_spec("http://b/v3/api-docs", spec("http://b"));
        let factory = StaticFactory::default();

        let sources = vec![
            ApiSource::new("a", "http://a/v3/api-docs").with_auth("Bearer a"),
            ApiSource::new("broken", "http://missing/v3/api-docs"),
            ApiSource::new("b", "http://b/v3/api-docs").with_base_url("http://override"),
            ApiSource::new("A", "http://b/v3/api-docs"),
        ];

        let registry = ApiRegistry::load(&sources, &loader, &factory).await;
        assert_eq!(registry.names(), vec!["a", "b"]);

        let a = registry.get("a").expect("a");
        assert_eq!(a.base_url(), "http://a");
        assert_eq!(a.auth(), Some("Bearer a"));
        assert_eq!(a.display_title(), "Pinger (v3)");
        assert_eq!(a.source(), "http://a/v3/api-docs");

        assert_eq!(registry.get("b").expect("b").base_url(), "http://override");
    }

    #[tokio::test]
    async fn load_with_every_source_failing_yields_empty_registry() {
        let loader = StaticLoader::new();
        let factory = StaticFactory::default();
        let sources = vec![ApiSource::new("x", "http://nowhere")];

        let registry = ApiRegistry::load(&sources, &loader, &factory).await;
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn load_rejects_missing_base_url() {
        let loader = StaticLoader::new().with_spec("spec.json", spec(""));
        let factory = StaticFactory::default();
        let registry = ApiRegistry::load(&[ApiSource::new("x", "spec.json")], &loader, &factory).await;
        assert!(registry.is_empty());
    }

    #[test]
    fn debug_output_redacts_credential() {
        let e = ApiEntry::new("x", EndpointCatalog::default(), Arc::new(RecordingClient::ok("http://x", 200, "")))
            .with_auth(Some("Bearer secret".to_owned()));
        let rendered = format!("{e:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
