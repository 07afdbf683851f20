//! Cache-aware response writer
//!
//! `send_cached(content_type, payload, {code, ttl})` builds the response
//! and tags it for the cache layer. Nothing here knows how the cache is
//! keyed or stored.

use std::time::Duration;

use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use serde::Serialize;

use crate::response::JSON_CONTENT_TYPE;

/// Status code and cache lifetime for a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    pub code: u16,
    pub ttl: Duration,
}

/// Response extension read by the cache middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheDirective {
    pub ttl: Duration,
}

/// Write `payload` with the given content type and status, and mark it
/// for caching for `options.ttl`.
pub fn send_cached(content_type: &str, payload: impl Into<Body>, options: CacheOptions) -> Response {
    let mut response = Response::new(payload.into());
    *response.status_mut() =
        StatusCode::from_u16(options.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(content_type) {
        headers.insert(CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("max-age={}", options.ttl.as_secs())) {
        headers.insert(CACHE_CONTROL, value);
    }

    response
        .extensions_mut()
        .insert(CacheDirective { ttl: options.ttl });
    response
}

/// JSON convenience over [`send_cached`]
pub fn send_json_cached<T: Serialize>(
    document: &T,
    options: CacheOptions,
) -> Result<Response, serde_json::Error> {
    let body = serde_json::to_vec(document)?;
    Ok(send_cached(JSON_CONTENT_TYPE, body, options))
}
