// ABOUTME: Turns a generic "call this operation with these arguments" request into an HTTP call
// ABOUTME: Classifies parameters, validates required ones, substitutes paths, and injects auth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

//! # Call Dispatch
//!
//! [`CallDispatcher`] runs the `call_api` pipeline against one resolved
//! [`ApiEntry`]:
//!
//! 1. resolve the operationId (exact, then case-insensitive)
//! 2. classify each declared parameter by location; path/query/header values
//!    are stringified, body values keep their JSON type
//! 3. caller-supplied headers go in first, declared header parameters after
//! 4. every missing required parameter is reported at once, before any I/O
//! 5. `{name}` placeholders are substituted; unsupplied optional ones stay
//! 6. the API's fixed credential is added unless the caller sent `Authorization`
//! 7. the request is sent through the entry's [`HttpClient`](crate::http::HttpClient)
//! 8. the response (or transport failure) becomes agent-readable text
//!
//! Every failure here is a value ([`CallError`]), never a panic or protocol fault.

use std::fmt;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::http::{HttpResponse, OutboundRequest};
use crate::registry::ApiEntry;
use crate::types::{EndpointRecord, ParamLocation};

/// Header carrying the fixed per-API credential
const AUTHORIZATION: &str = "Authorization";

/// Why a call produced no HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// No endpoint with this operationId
    UnknownOperation(String),
    /// `parameters` or `headers` was not a JSON object
    InvalidArguments(String),
    /// Required parameters were absent or null, as `name (location)` labels
    MissingParameters {
        /// The resolved operationId
        operation_id: String,
        /// Every missing parameter in declaration order
        missing: Vec<String>,
    },
    /// The HTTP client failed (connection, timeout, invalid URL, ...)
    Transport(String),
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOperation(id) => write!(
                f,
                "Endpoint not found: {id}\nUse search_api or list_api_endpoints to find valid operationIds."
            ),
            Self::InvalidArguments(msg) => f.write_str(msg),
            Self::MissingParameters {
                operation_id,
                missing,
            } => write!(
                f,
                "Missing required parameters: {}\n\nUse search_api with operationId '{operation_id}' to see all parameter details.",
                missing.join(", ")
            ),
            Self::Transport(msg) => write!(f, "API call failed: {msg}"),
        }
    }
}

/// A validated request, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCall {
    /// The resolved operationId (canonical casing)
    pub operation_id: String,
    /// The outbound request
    pub request: OutboundRequest,
    /// `{name}` placeholders left in the path because no value was supplied
    pub unresolved_placeholders: Vec<String>,
}

/// Executes `call_api` invocations against one registered API
pub struct CallDispatcher<'a> {
    entry: &'a ApiEntry,
}

impl<'a> CallDispatcher<'a> {
    /// Create a dispatcher for the given API
    pub const fn new(entry: &'a ApiEntry) -> Self {
        Self { entry }
    }

    /// Resolve the operation and build the outbound request without sending it
    ///
    /// `parameters` and `headers` may be absent or `null`; otherwise they must
    /// be JSON objects.
    pub fn prepare(
        &self,
        operation_id: &str,
        parameters: Option<&Value>,
        headers: Option<&Value>,
    ) -> Result<PreparedCall, CallError> {
        let endpoint = self
            .entry
            .catalog()
            .by_operation_id(operation_id)
            .ok_or_else(|| CallError::UnknownOperation(operation_id.to_owned()))?;

        let args = object_argument("parameters", parameters)?;
        let custom_headers = object_argument("headers", headers)?;

        let mut path_values: Vec<(&str, String)> = Vec::new();
        let mut query = Vec::new();
        let mut header_values = Vec::new();
        let mut body = Map::new();

        if let Some(custom) = custom_headers {
            for (name, value) in custom {
                if !value.is_null() {
                    upsert_header(&mut header_values, name, stringify(value));
                }
            }
        }

        for param in &endpoint.parameters {
            let Some(value) = args.and_then(|a| a.get(&param.name)).filter(|v| !v.is_null()) else {
                continue;
            };
            match param.location {
                ParamLocation::Path => path_values.push((param.name.as_str(), stringify(value))),
                ParamLocation::Query => query.push((param.name.clone(), stringify(value))),
                ParamLocation::Header => upsert_header(&mut header_values, &param.name, stringify(value)),
                ParamLocation::Body => {
                    body.insert(param.name.clone(), value.clone());
                }
            }
        }

        let missing = missing_required(endpoint, args);
        if !missing.is_empty() {
            return Err(CallError::MissingParameters {
                operation_id: endpoint.operation_id.clone(),
                missing,
            });
        }

        let (path, unresolved_placeholders) = substitute_path(&endpoint.path, &path_values);
        if !unresolved_placeholders.is_empty() {
            warn!(
                operation_id = %endpoint.operation_id,
                path = %path,
                unresolved = ?unresolved_placeholders,
                "Path placeholders left unresolved"
            );
        }

        if let Some(auth) = self.entry.auth() {
            if !header_values
                .iter()
                .any(|(k, _)| k.eq_ignore_ascii_case(AUTHORIZATION))
            {
                header_values.push((AUTHORIZATION.to_owned(), auth.to_owned()));
            }
        }

        Ok(PreparedCall {
            operation_id: endpoint.operation_id.clone(),
            request: OutboundRequest {
                method: endpoint.method,
                path,
                query,
                headers: header_values,
                body: (!body.is_empty()).then_some(Value::Object(body)),
            },
            unresolved_placeholders,
        })
    }

    /// Run the whole pipeline and return the formatted response text
    pub async fn call(
        &self,
        operation_id: &str,
        parameters: Option<&Value>,
        headers: Option<&Value>,
    ) -> Result<String, CallError> {
        let prepared = self.prepare(operation_id, parameters, headers)?;
        let request = &prepared.request;

        match self.entry.client().send(request).await {
            Ok(response) => {
                info!(
                    api = %self.entry.name(),
                    operation_id = %prepared.operation_id,
                    method = %request.method,
                    path = %request.path,
                    status = response.status,
                    "API call completed"
                );
                Ok(format_response(request, &response))
            }
            Err(e) => {
                warn!(
                    api = %self.entry.name(),
                    operation_id = %prepared.operation_id,
                    method = %request.method,
                    path = %request.path,
                    error = %e,
                    "API call failed"
                );
                Err(CallError::Transport(e.message))
            }
        }
    }
}

/// Accept an absent/null argument or a JSON object; reject anything else
fn object_argument<'v>(
    name: &str,
    value: Option<&'v Value>,
) -> Result<Option<&'v Map<String, Value>>, CallError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(CallError::InvalidArguments(format!(
            "'{name}' must be a JSON object, got: {other}"
        ))),
    }
}

/// Text passes through verbatim; everything else uses its compact JSON form
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Set a header, replacing an earlier one with the same case-insensitive name
fn upsert_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(existing) => *existing = (name.to_owned(), value),
        None => headers.push((name.to_owned(), value)),
    }
}

/// `name (location)` labels for required parameters that are absent or null
fn missing_required(endpoint: &EndpointRecord, args: Option<&Map<String, Value>>) -> Vec<String> {
    endpoint
        .parameters
        .iter()
        .filter(|p| p.required)
        .filter(|p| args.and_then(|a| a.get(&p.name)).is_none_or(Value::is_null))
        .map(|p| format!("{} ({})", p.name, p.location))
        .collect()
}

/// Fill `{name}` placeholders in one left-to-right pass over the template
///
/// Inserted values are never rescanned. Placeholders with no supplied value
/// stay literal and their names are returned alongside the path.
pub fn substitute_path(template: &str, values: &[(&str, String)]) -> (String, Vec<String>) {
    let mut path = String::with_capacity(template.len());
    let mut unresolved = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start + 1..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + 1 + len];
        path.push_str(&rest[..start]);
        match values.iter().find(|(n, _)| *n == name) {
            Some((_, value)) => path.push_str(value),
            None => {
                path.push_str(&rest[start..=start + 1 + len]);
                unresolved.push(name.to_owned());
            }
        }
        rest = &rest[start + len + 2..];
    }

    path.push_str(rest);
    (path, unresolved)
}

/// Render a response as the text block returned to the agent
///
/// JSON bodies are pretty-printed; other bodies are shown verbatim.
pub fn format_response(request: &OutboundRequest, response: &HttpResponse) -> String {
    let mut out = String::from("=== HTTP Response ===\n");
    out.push_str(&format!("Request: {} {}\n", request.method, request.path));
    out.push_str(&format!("Status: {response}\n\n"));

    out.push_str("Response body:\n");
    if response.body.trim().is_empty() {
        out.push_str("(empty response body)");
        return out;
    }

    match serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
    {
        Some(pretty) => out.push_str(&pretty),
        None => out.push_str(&response.body),
    }
    out
}
