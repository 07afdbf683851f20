//! # Error Serialization
//!
//! Renders an [`ErrorResponseDocument`] as JSON (default) or XML
//! (`?format=xml`). Both paths emit the same fields.

mod document;
mod xml;

use axum::extract::Query;
use axum::http::Uri;
use serde::Deserialize;
use thiserror::Error;

pub use document::{ErrorBody, ErrorResponseDocument, ERROR_SOURCE};
pub use xml::to_xml;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// Result type for rendering
pub type RenderResult<T> = Result<T, RenderError>;

/// Serialization failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML encoding failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Requested body format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

#[derive(Debug, Deserialize)]
struct FormatQuery {
    format: Option<String>,
}

impl ResponseFormat {
    /// `xml` selects XML; anything else, including a missing or
    /// unparsable query, selects JSON.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("xml") => ResponseFormat::Xml,
            _ => ResponseFormat::Json,
        }
    }

    /// Format requested by the `format` query parameter of `uri`
    pub fn from_uri(uri: &Uri) -> Self {
        Query::<FormatQuery>::try_from_uri(uri)
            .map(|Query(query)| Self::parse(query.format.as_deref()))
            .unwrap_or_default()
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ResponseFormat::Json => JSON_CONTENT_TYPE,
            ResponseFormat::Xml => XML_CONTENT_TYPE,
        }
    }
}

/// Rendered payload with its content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

pub fn render(document: &ErrorResponseDocument, format: ResponseFormat) -> RenderResult<Rendered> {
    let body = match format {
        ResponseFormat::Json => serde_json::to_vec(document)?,
        ResponseFormat::Xml => to_xml(document)?,
    };

    Ok(Rendered {
        content_type: format.content_type(),
        body,
    })
}
