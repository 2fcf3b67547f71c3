// ABOUTME: Generic REST API bridge library driven by OpenAPI/Swagger documents
// ABOUTME: Re-exports the registry, endpoint catalog, document parser, HTTP client, and dispatcher
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

//! # Apiscout: Any REST API Through Five Operations
//!
//! Loads OpenAPI 3.x / Swagger 2.0 documents, indexes their operations into
//! searchable [`EndpointCatalog`]s, and invokes any operation through a
//! generic [`CallDispatcher`]. Several independent APIs can be registered at
//! once, each with its own base URL and optional fixed credential.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apiscout::{ApiRegistry, ApiSource, DocumentLoader, HttpClientConfig, ReqwestClientFactory};
//!
//! # async fn example() -> Result<(), apiscout::ApiError> {
//! let http = HttpClientConfig::default();
//! let loader = DocumentLoader::new(&http)?;
//! let factory = ReqwestClientFactory::new(http);
//! let sources = vec![ApiSource::new("petstore", "https://petstore3.swagger.io/api/v3/openapi.json")];
//!
//! let registry = ApiRegistry::load(&sources, &loader, &factory).await;
//! for entry in registry.entries() {
//!     println!("{}: {} endpoints", entry.display_title(), entry.catalog().len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: Endpoint/parameter records, HTTP methods, errors
//! - [`config`]: API sources, client settings, CLI value parsing
//! - [`openapi`]: Document parsing into endpoint records
//! - [`loader`]: Fetching documents from URLs or files
//! - [`catalog`]: Per-API index by tag and operationId, keyword search
//! - [`http`]: Outbound request model and reqwest client
//! - [`registry`]: Ordered set of registered APIs and name resolution
//! - [`dispatch`]: The generic call pipeline

/// Core types: endpoint records, parameter locations, and errors
pub mod types;

/// Per-API endpoint index and keyword search
pub mod catalog;
/// API sources, HTTP client settings, and configuration parsing
pub mod config;
/// Generic operation invocation
pub mod dispatch;
/// Outbound HTTP request model and client implementations
pub mod http;
/// Interface document loading
pub mod loader;
/// OpenAPI 3.x and Swagger 2.0 document parsing
pub mod openapi;
/// Registered API collection
pub mod registry;

#[cfg(test)]
mod test_support;

pub use catalog::{EndpointCatalog, TagListing};
pub use config::{ApiSource, HttpClientConfig, DEFAULT_API_NAME};
pub use dispatch::{CallDispatcher, CallError};
pub use http::{ClientFactory, HttpClient, HttpResponse, OutboundRequest, ReqwestClientFactory};
pub use loader::{DocumentLoader, SpecLoader};
pub use registry::{ApiEntry, ApiRegistry, ResolveError, SharedRegistry};
pub use types::{ApiError, EndpointRecord, ErrorKind, HttpMethod, ParamLocation, ParameterRecord, ParsedSpec};
