// ABOUTME: Core types for the REST API bridge: errors, endpoint and parameter records
// ABOUTME: Provides ApiError, HttpMethod, ParamLocation, EndpointRecord, and ParsedSpec
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

//! # Core Types
//!
//! Self-contained type definitions shared by the catalog, registry, document
//! parser, and call dispatcher. Records are produced once by the document
//! parser and are read-only afterwards.

use std::fmt;

// ============================================================================
// Error Type
// ============================================================================

/// Error type for registry, document, and transport operations
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error category
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
}

/// Categories of errors produced by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Internal error (bug, unexpected state)
    Internal,
    /// Configuration error
    Config,
    /// Interface document could not be fetched or parsed
    Document,
    /// Network failure talking to a backend API
    Transport,
    /// Outbound request could not be built from the supplied arguments
    InvalidRequest,
}

impl ApiError {
    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Internal,
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Config,
            message: message.into(),
        }
    }

    /// Create a document error for the given source reference
    pub fn document(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Document,
            message: format!("{}: {}", source.into(), message.into()),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transport,
            message: message.into(),
        }
    }

    /// Create an invalid-request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidRequest,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<fmt::Error> for ApiError {
    fn from(e: fmt::Error) -> Self {
        Self::internal(format!("Failed to render output: {e}"))
    }
}

// ============================================================================
// HTTP Method
// ============================================================================

/// HTTP methods an endpoint record may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl HttpMethod {
    /// Methods in the order operations are collected from a path item
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Head,
        Self::Options,
    ];

    /// Upper-case wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Lower-case key used by path items in interface documents
    #[must_use]
    pub const fn document_key(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Patch => "patch",
            Self::Head => "head",
            Self::Options => "options",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Endpoint Records
// ============================================================================

/// Where a declared parameter travels in the outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    /// Substituted into a `{name}` placeholder of the path template
    Path,
    /// Appended to the query string
    Query,
    /// Sent as an HTTP header
    Header,
    /// Collected into the JSON request body object
    Body,
}

impl ParamLocation {
    /// Parse the `in` value of a document parameter
    ///
    /// `formData` is folded into `Body`; `cookie` and unknown locations
    /// return `None` and are skipped by the parser.
    #[must_use]
    pub fn from_document(value: &str) -> Option<Self> {
        match value {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "body" | "formData" => Some(Self::Body),
            _ => None,
        }
    }

    /// Lower-case name used in listings and error messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declared parameter of an endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRecord {
    /// Parameter name (argument key supplied by the caller)
    pub name: String,
    /// Where the value is placed in the outbound request
    pub location: ParamLocation,
    /// Declared schema type, echoed in listings but never enforced
    pub declared_type: String,
    /// Whether the caller must supply a non-null value
    pub required: bool,
    /// Free-text description from the document
    pub description: String,
}

impl ParameterRecord {
    /// Create a parameter record with an empty description
    pub fn new(
        name: impl Into<String>,
        location: ParamLocation,
        declared_type: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            declared_type: declared_type.into(),
            required,
            description: String::new(),
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// One described HTTP operation of a backend API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRecord {
    /// Catalog-unique operation name (first insertion wins on duplicates)
    pub operation_id: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Path template with `{name}` placeholders
    pub path: String,
    /// One-line summary
    pub summary: String,
    /// Longer description
    pub description: String,
    /// Declared parameters in document order
    pub parameters: Vec<ParameterRecord>,
    /// Grouping tags (empty means the implicit `default` tag)
    pub tags: Vec<String>,
}

impl EndpointRecord {
    /// Create an endpoint with no parameters, tags, or text
    pub fn new(operation_id: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            operation_id: operation_id.into(),
            method,
            path: path.into(),
            summary: String::new(),
            description: String::new(),
            parameters: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Set the summary
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a parameter
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterRecord) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Replace the tag list
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Names of required parameters, in declaration order
    pub fn required_parameter_names(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Names of optional parameters, in declaration order
    pub fn optional_parameter_names(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| !p.required)
            .map(|p| p.name.as_str())
            .collect()
    }
}

/// Output of parsing one interface document
#[derive(Debug, Clone, Default)]
pub struct ParsedSpec {
    /// Endpoint records in document order
    pub endpoints: Vec<EndpointRecord>,
    /// Base URL declared by (or derived for) the document
    pub base_url: String,
    /// `info.title`, when present
    pub title: Option<String>,
    /// `info.version`, when present
    pub version: Option<String>,
}
