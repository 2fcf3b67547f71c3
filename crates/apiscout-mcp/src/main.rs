// ABOUTME: CLI entry point for the apiscout MCP server binary
// ABOUTME: Parses API sources, loads their documents into a registry, and serves over stdio
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use apiscout::config::{apply_overrides, parse_named_value, parse_timeout};
use apiscout::{
    ApiError, ApiRegistry, ApiSource, DocumentLoader, HttpClientConfig, ReqwestClientFactory,
    DEFAULT_API_NAME,
};
use apiscout_mcp::{build_tool_registry, McpServer, McpTransport, StdioTransport};
use clap::Parser;
use tracing::info;

const USAGE_HINT: &str = "No API configured.\n\n\
Usage:\n  \
apiscout-mcp <SPEC> [BASE_URL]\n  \
apiscout-mcp --api local=http://localhost:8080/v3/api-docs --api dev=./dev-openapi.yaml\n\n\
Environment:\n  \
APISCOUT_SPEC_URL, APISCOUT_BASE_URL   single API registered as \"default\"\n  \
APISCOUT_APIS                          comma-separated NAME=SOURCE pairs\n  \
APISCOUT_AUTH                          comma-separated NAME=CREDENTIAL pairs";

/// apiscout-mcp: browse, search, and call OpenAPI-described REST APIs over MCP
#[derive(Parser)]
#[command(name = "apiscout-mcp", version, about)]
struct Cli {
    /// OpenAPI/Swagger document URL or path, registered as "default"
    #[arg(env = "APISCOUT_SPEC_URL")]
    spec: Option<String>,

    /// Base URL for the positional document, overriding the one it declares
    #[arg(env = "APISCOUT_BASE_URL")]
    base_url: Option<String>,

    /// Register an API (repeatable)
    #[arg(
        long = "api",
        value_name = "NAME=SOURCE",
        env = "APISCOUT_APIS",
        value_delimiter = ',',
        value_parser = parse_named_value
    )]
    apis: Vec<(String, String)>,

    /// Fixed Authorization header value for an API (repeatable)
    #[arg(
        long = "auth",
        value_name = "NAME=CREDENTIAL",
        env = "APISCOUT_AUTH",
        value_delimiter = ',',
        value_parser = parse_named_value,
        hide_env_values = true
    )]
    auth: Vec<(String, String)>,

    /// Base URL override for a named API (repeatable)
    #[arg(long = "base-url", value_name = "NAME=URL", value_parser = parse_named_value)]
    base_urls: Vec<(String, String)>,

    /// Timeout in seconds for document fetches and API calls [default: 30]
    #[arg(long, value_name = "SECS", env = "APISCOUT_TIMEOUT", value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// TOML file with [[api]] tables (defaults to <config dir>/apiscout/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Entries from the command line and environment, in declaration order
    fn sources(&self) -> Vec<ApiSource> {
        let mut sources = Vec::new();

        if let Some(spec) = self.spec.as_deref().filter(|s| !s.trim().is_empty()) {
            let mut source = ApiSource::new(DEFAULT_API_NAME, spec);
            if let Some(base_url) = self.base_url.as_deref().filter(|s| !s.trim().is_empty()) {
                source = source.with_base_url(base_url);
            }
            sources.push(source);
        }

        sources.extend(
            self.apis
                .iter()
                .map(|(name, source)| ApiSource::new(name, source)),
        );
        sources
    }
}

/// File entries (when enabled) followed by CLI entries, with overrides applied
async fn resolve_sources(cli: &Cli, http: &mut HttpClientConfig) -> Result<Vec<ApiSource>, ApiError> {
    let mut sources = load_file_sources(cli, http).await?;
    sources.extend(cli.sources());

    if sources.is_empty() {
        return Err(ApiError::config(USAGE_HINT));
    }

    apply_overrides(&mut sources, &cli.auth, &cli.base_urls)?;
    Ok(sources)
}

#[cfg(feature = "config-file")]
async fn load_file_sources(cli: &Cli, http: &mut HttpClientConfig) -> Result<Vec<ApiSource>, ApiError> {
    use apiscout::config::FileConfig;

    let path = match &cli.config {
        Some(path) => path.clone(),
        None => match FileConfig::default_path().filter(|p| p.is_file()) {
            Some(path) => path,
            None => return Ok(Vec::new()),
        },
    };

    let file = FileConfig::load(&path).await?;
    info!(path = %path.display(), apis = file.apis.len(), "Loaded config file");
    if let (None, Some(secs)) = (cli.timeout, file.timeout_secs) {
        http.timeout = Duration::from_secs(secs);
    }
    Ok(file.apis)
}

#[cfg(not(feature = "config-file"))]
async fn load_file_sources(cli: &Cli, _http: &mut HttpClientConfig) -> Result<Vec<ApiSource>, ApiError> {
    match &cli.config {
        Some(path) => Err(ApiError::config(format!(
            "Cannot read {}: this build has no config file support (enable the config-file feature)",
            path.display()
        ))),
        None => Ok(Vec::new()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr to keep stdout clean for the protocol stream
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut http = HttpClientConfig::default();
    if let Some(timeout) = cli.timeout {
        http = http.with_timeout(timeout);
    }
    let sources = resolve_sources(&cli, &mut http).await?;

    info!(apis = sources.len(), timeout_secs = http.timeout.as_secs(), "Loading API documents");

    let loader = DocumentLoader::new(&http)?;
    let factory = ReqwestClientFactory::new(http);
    let registry = Arc::new(ApiRegistry::load(&sources, &loader, &factory).await);

    info!(
        apis = ?registry.names(),
        "Starting apiscout MCP server on stdio"
    );

    let server = Arc::new(McpServer::new(registry, build_tool_registry()));
    StdioTransport::stdio().serve(server).await?;

    Ok(())
}
