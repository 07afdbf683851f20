//! Response cache middleware
//!
//! Serves `GET`/`HEAD` requests from the cache when a live entry exists for
//! the request fingerprint; otherwise runs the inner service and stores any
//! response tagged with a [`CacheDirective`].

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use axum::middleware::Next;
use axum::response::Response;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

use crate::observability::{log_event, Event};

use super::store::{CachedResponse, ResponseCache};
use super::writer::CacheDirective;

/// Marks whether a response was replayed from the cache
pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");

/// Request fingerprint: SHA-256 over method, path and query
pub fn fingerprint(method: &Method, uri: &Uri) -> String {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    let mut hasher = Sha256::new();
    hasher.update(method.as_str().as_bytes());
    hasher.update(b" ");
    hasher.update(path_and_query.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

fn header_text(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn is_cacheable(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

pub async fn response_cache(
    State(cache): State<Arc<dyn ResponseCache>>,
    request: Request,
    next: Next,
) -> Response {
    if !is_cacheable(request.method()) {
        return next.run(request).await;
    }

    let key = fingerprint(request.method(), request.uri());
    if let Some(hit) = cache.get(&key) {
        let mut response = hit.to_response();
        response
            .headers_mut()
            .insert(CACHE_STATUS_HEADER, HeaderValue::from_static("HIT"));
        return response;
    }

    let response = next.run(request).await;
    let Some(directive) = response.extensions().get::<CacheDirective>().copied() else {
        return response;
    };
    if directive.ttl.is_zero() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let body = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            let error = err.to_string();
            log_event(
                Event::CacheStoreFailed,
                &[("error", error.as_str()), ("status", parts.status.as_str())],
            );
            return Response::from_parts(parts, Body::empty());
        }
    };

    cache.put(
        &key,
        CachedResponse {
            status: parts.status.as_u16(),
            content_type: header_text(&parts.headers, &CONTENT_TYPE),
            cache_control: header_text(&parts.headers, &CACHE_CONTROL),
            body: body.clone(),
        },
        directive.ttl,
    );

    parts
        .headers
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static("MISS"));
    Response::from_parts(parts, Body::from(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_depends_on_query() {
        let a: Uri = "/api/iframely?url=https://a.com".parse().unwrap();
        let b: Uri = "/api/iframely?url=https://a.com&format=xml".parse().unwrap();

        assert_ne!(fingerprint(&Method::GET, &a), fingerprint(&Method::GET, &b));
        assert_eq!(fingerprint(&Method::GET, &a), fingerprint(&Method::GET, &a));
    }

    #[test]
    fn test_fingerprint_depends_on_method() {
        let uri: Uri = "/oembed".parse().unwrap();
        assert_ne!(
            fingerprint(&Method::GET, &uri),
            fingerprint(&Method::HEAD, &uri)
        );
    }

    #[test]
    fn test_only_safe_methods_cacheable() {
        assert!(is_cacheable(&Method::GET));
        assert!(is_cacheable(&Method::HEAD));
        assert!(!is_cacheable(&Method::POST));
        assert!(!is_cacheable(&Method::DELETE));
    }
}
