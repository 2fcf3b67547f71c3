// ABOUTME: OpenAPI 3.x and Swagger 2.0 document parsing into endpoint records
// ABOUTME: Handles JSON or YAML input, local $ref resolution, body expansion, and base URLs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

//! # Interface Document Parsing
//!
//! Turns an OpenAPI 3.x or Swagger 2.0 document into a [`ParsedSpec`].
//! Only the information the bridge needs is extracted: operations, their
//! parameters (with JSON request bodies flattened into `body` parameters),
//! tags, the declared base URL, and the display title/version.
//!
//! Request body schemas are expanded one level: the top-level `properties`
//! of the (possibly `$ref`-erenced) schema become individual `body`
//! parameters, with `required` taken from the schema's `required` list.

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{ApiError, EndpointRecord, HttpMethod, ParamLocation, ParameterRecord, ParsedSpec};

/// Maximum number of chained `$ref` hops followed before giving up
const MAX_REF_DEPTH: usize = 8;

/// Path suffixes stripped from a document URL to guess the API base URL
const DOC_PATH_MARKERS: &[&str] = &["/v3/api-docs", "/swagger", "/openapi"];

/// Document dialect, detected from the root `openapi` / `swagger` key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    OpenApi3,
    Swagger2,
}

/// Parse document text (JSON first, YAML as fallback) into a [`ParsedSpec`]
///
/// `source` is the document reference; it is used for error messages and to
/// derive a base URL when the document declares none.
pub fn parse_document(source: &str, text: &str) -> Result<ParsedSpec, ApiError> {
    let root = decode(source, text)?;
    parse_value(source, &root)
}

/// Parse an already-decoded document
pub fn parse_value(source: &str, root: &Value) -> Result<ParsedSpec, ApiError> {
    let Some(obj) = root.as_object() else {
        return Err(ApiError::document(source, "document root is not an object"));
    };

    let dialect = if obj.contains_key("swagger") {
        Dialect::Swagger2
    } else if obj.contains_key("openapi") || obj.contains_key("paths") {
        Dialect::OpenApi3
    } else {
        return Err(ApiError::document(
            source,
            "not an OpenAPI or Swagger document (no 'openapi', 'swagger', or 'paths' key)",
        ));
    };

    let mut endpoints = Vec::new();
    if let Some(paths) = obj.get("paths").and_then(Value::as_object) {
        for (path, item) in paths {
            let Some(item) = resolve(root, item).and_then(Value::as_object) else {
                continue;
            };
            collect_path_item(root, dialect, path, item, &mut endpoints);
        }
    }

    let info = obj.get("info");
    let title = info.and_then(|i| text_field(i, "title"));
    let version = info.and_then(|i| text_field(i, "version"));

    let base_url = match dialect {
        Dialect::OpenApi3 => openapi3_base_url(obj, source),
        Dialect::Swagger2 => swagger2_base_url(obj, source),
    };

    debug!(
        source,
        endpoints = endpoints.len(),
        base_url = %base_url,
        "Parsed interface document"
    );

    Ok(ParsedSpec {
        endpoints,
        base_url,
        title,
        version,
    })
}

/// Decode JSON, falling back to YAML when the text is not JSON
fn decode(source: &str, text: &str) -> Result<Value, ApiError> {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => Ok(v),
        Err(json_err) => serde_yaml::from_str::<Value>(text).map_err(|yaml_err| {
            ApiError::document(
                source,
                format!("neither valid JSON ({json_err}) nor valid YAML ({yaml_err})"),
            )
        }),
    }
}

/// Extract every operation of one path item, in [`HttpMethod::ALL`] order
fn collect_path_item(
    root: &Value,
    dialect: Dialect,
    path: &str,
    item: &Map<String, Value>,
    out: &mut Vec<EndpointRecord>,
) {
    let shared_params = item.get("parameters");

    for method in HttpMethod::ALL {
        let Some(operation) = item.get(method.document_key()).and_then(Value::as_object) else {
            continue;
        };

        let operation_id = operation
            .get("operationId")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(|| generate_operation_id(method, path), ToOwned::to_owned);

        let mut parameters = Vec::new();
        for list in [shared_params, operation.get("parameters")] {
            for raw in list.and_then(Value::as_array).into_iter().flatten() {
                collect_parameter(root, raw, &mut parameters);
            }
        }

        if dialect == Dialect::OpenApi3 {
            if let Some(schema) = request_body_schema(root, operation.get("requestBody")) {
                expand_body_schema(root, schema, &mut parameters);
            }
        }

        let summary = text_or_empty(operation.get("summary"));
        let description = operation
            .get("description")
            .and_then(Value::as_str)
            .map_or_else(|| summary.clone(), ToOwned::to_owned);
        let tags = operation
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        debug!(method = %method, path, operation_id = %operation_id, "Collected endpoint");

        out.push(EndpointRecord {
            operation_id,
            method,
            path: path.to_owned(),
            summary,
            description,
            parameters,
            tags,
        });
    }
}

/// Add one declared parameter, letting later declarations replace earlier
/// ones with the same name and location (operation-level beats path-level)
fn collect_parameter(root: &Value, raw: &Value, out: &mut Vec<ParameterRecord>) {
    let Some(param) = resolve(root, raw) else {
        return;
    };
    let Some(name) = param.get("name").and_then(Value::as_str) else {
        return;
    };
    let Some(location_str) = param.get("in").and_then(Value::as_str) else {
        return;
    };

    // Swagger 2.0 body parameter: flatten its schema like an OpenAPI 3 requestBody
    if location_str == "body" {
        if let Some(schema) = param.get("schema") {
            expand_body_schema(root, schema, out);
        }
        return;
    }

    let Some(location) = ParamLocation::from_document(location_str) else {
        debug!(name, location = location_str, "Skipping unsupported parameter location");
        return;
    };

    let declared_type = param
        .get("schema")
        .and_then(|s| resolve(root, s))
        .and_then(schema_type)
        .or_else(|| schema_type(param))
        .unwrap_or_else(|| "string".to_owned());

    let record = ParameterRecord {
        name: name.to_owned(),
        location,
        declared_type,
        required: param.get("required").and_then(Value::as_bool).unwrap_or(false),
        description: text_or_empty(param.get("description")),
    };

    upsert_parameter(out, record);
}

fn upsert_parameter(out: &mut Vec<ParameterRecord>, record: ParameterRecord) {
    match out
        .iter_mut()
        .find(|p| p.name == record.name && p.location == record.location)
    {
        Some(existing) => *existing = record,
        None => out.push(record),
    }
}

/// Locate the JSON schema of an OpenAPI 3 request body
fn request_body_schema<'a>(root: &'a Value, body: Option<&'a Value>) -> Option<&'a Value> {
    let body = resolve(root, body?)?;
    let content = body.get("content")?.as_object()?;
    let media = content
        .get("application/json")
        .or_else(|| {
            content
                .iter()
                .find(|(media_type, _)| media_type.contains("json"))
                .map(|(_, v)| v)
        })?;
    media.get("schema")
}

/// Flatten the top-level properties of a body schema into `body` parameters
fn expand_body_schema(root: &Value, schema: &Value, out: &mut Vec<ParameterRecord>) {
    let Some(schema) = resolve(root, schema) else {
        return;
    };
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };

    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    for (name, prop) in properties {
        let prop = resolve(root, prop).unwrap_or(prop);
        let record = ParameterRecord {
            name: name.clone(),
            location: ParamLocation::Body,
            declared_type: schema_type(prop).unwrap_or_else(|| "string".to_owned()),
            required: required.contains(&name.as_str()),
            description: text_or_empty(prop.get("description")),
        };
        upsert_parameter(out, record);
    }
}

/// Follow local `$ref` pointers (`#/components/...`, `#/definitions/...`)
///
/// Returns `None` for dangling or non-local references.
fn resolve<'a>(root: &'a Value, value: &'a Value) -> Option<&'a Value> {
    let mut current = value;
    for _ in 0..MAX_REF_DEPTH {
        let Some(reference) = current.get("$ref").and_then(Value::as_str) else {
            return Some(current);
        };
        let pointer = reference.strip_prefix('#')?;
        current = root.pointer(pointer)?;
    }
    None
}

/// Declared type of a schema; OpenAPI 3.1 type arrays yield the first non-null entry
fn schema_type(schema: &Value) -> Option<String> {
    match schema.get("type")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null")
            .map(ToOwned::to_owned),
        _ => None,
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(ToOwned::to_owned)
}

fn text_or_empty(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or("").to_owned()
}

/// Build an operationId for operations that declare none
///
/// `GET /pet/{petId}` becomes `get_pet_petId`.
pub fn generate_operation_id(method: HttpMethod, path: &str) -> String {
    let cleaned: String = path
        .chars()
        .filter(|c| *c != '{' && *c != '}')
        .map(|c| if c == '/' { '_' } else { c })
        .collect();
    format!("{}_{}", method.document_key(), cleaned.trim_matches('_'))
}

// ============================================================================
// Base URL Resolution
// ============================================================================

fn openapi3_base_url(obj: &Map<String, Value>, source: &str) -> String {
    let server = obj
        .get("servers")
        .and_then(Value::as_array)
        .and_then(|servers| servers.first());

    let Some(url) = server.and_then(|s| s.get("url")).and_then(Value::as_str) else {
        return derive_base_url(source);
    };

    let url = substitute_server_variables(url, server.and_then(|s| s.get("variables")));
    if url.starts_with('/') {
        return origin(source).map_or(url.clone(), |o| format!("{o}{url}"));
    }
    url
}

/// Replace `{var}` in a server URL with each variable's declared default
fn substitute_server_variables(url: &str, variables: Option<&Value>) -> String {
    let mut resolved = url.to_owned();
    if let Some(vars) = variables.and_then(Value::as_object) {
        for (name, var) in vars {
            if let Some(default) = var.get("default").and_then(Value::as_str) {
                resolved = resolved.replace(&format!("{{{name}}}"), default);
            }
        }
    }
    resolved
}

fn swagger2_base_url(obj: &Map<String, Value>, source: &str) -> String {
    let base_path = obj
        .get("basePath")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim_end_matches('/');

    let Some(host) = obj.get("host").and_then(Value::as_str) else {
        return origin(source).map_or_else(
            || derive_base_url(source),
            |o| format!("{o}{base_path}"),
        );
    };

    let scheme = obj
        .get("schemes")
        .and_then(Value::as_array)
        .and_then(|s| s.first())
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .or_else(|| source.split_once("://").map(|(scheme, _)| scheme.to_owned()))
        .unwrap_or_else(|| "https".to_owned());

    format!("{scheme}://{host}{base_path}")
}

/// Guess a base URL from the document URL by cutting well-known doc paths
///
/// `http://localhost:8080/v3/api-docs` becomes `http://localhost:8080`.
/// Only the path is searched, so a host such as `swagger.example.com` is kept.
pub fn derive_base_url(source: &str) -> String {
    let path_start = origin(source).map_or(0, |o| o.len());
    let mut base = source.to_owned();
    for marker in DOC_PATH_MARKERS {
        if let Some(idx) = base[path_start..].find(marker) {
            base.truncate(path_start + idx);
        }
    }
    base
}

/// `scheme://host[:port]` of an HTTP(S) URL, or `None` for other references
fn origin(source: &str) -> Option<String> {
    let (scheme, rest) = source.split_once("://")?;
    if scheme != "http" && scheme != "https" {
        return None;
    }
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    Some(format!("{scheme}://{authority}"))
}
