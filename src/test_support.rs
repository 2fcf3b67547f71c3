// ABOUTME: In-memory test doubles for the document loader and HTTP client collaborators
// ABOUTME: Records outbound requests so tests can assert on calls without network I/O
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::catalog::EndpointCatalog;
use crate::http::{ClientFactory, HttpClient, HttpResponse, OutboundRequest};
use crate::loader::SpecLoader;
use crate::registry::ApiEntry;
use crate::types::{ApiError, EndpointRecord, ParsedSpec};

/// HTTP client returning a canned outcome and recording every request
pub struct RecordingClient {
    base_url: String,
    outcome: Result<HttpResponse, ApiError>,
    calls: Mutex<Vec<OutboundRequest>>,
}

impl RecordingClient {
    pub fn ok(base_url: &str, status: u16, body: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
            outcome: Ok(HttpResponse {
                status,
                reason: "OK".to_owned(),
                body: body.to_owned(),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(base_url: &str, message: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
            outcome: Err(ApiError::transport(message)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<OutboundRequest> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl HttpClient for RecordingClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: &OutboundRequest) -> Result<HttpResponse, ApiError> {
        self.calls.lock().expect("calls lock").push(request.clone());
        self.outcome.clone()
    }
}

/// Loader serving pre-parsed documents keyed by source reference
#[derive(Default)]
pub struct StaticLoader {
    specs: HashMap<String, ParsedSpec>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spec(mut self, source: &str, spec: ParsedSpec) -> Self {
        self.specs.insert(source.to_owned(), spec);
        self
    }
}

#[async_trait]
impl SpecLoader for StaticLoader {
    async fn load(&self, source: &str) -> Result<ParsedSpec, ApiError> {
        self.specs
            .get(source)
            .cloned()
            .ok_or_else(|| ApiError::document(source, "not found"))
    }
}

/// Factory producing `200 OK` recording clients
#[derive(Default)]
pub struct StaticFactory;

impl ClientFactory for StaticFactory {
    fn create(&self, base_url: &str) -> Result<Arc<dyn HttpClient>, ApiError> {
        Ok(Arc::new(RecordingClient::ok(base_url, 200, "{}")))
    }
}

/// Entry with the given endpoints and a `200 OK` client
pub fn entry(name: &str, endpoints: Vec<EndpointRecord>) -> ApiEntry {
    ApiEntry::new(
        name,
        EndpointCatalog::new(endpoints),
        Arc::new(RecordingClient::ok("http://localhost:8080", 200, "{}")),
    )
}
