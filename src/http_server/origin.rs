//! Origin Policy
//!
//! Decides the `Access-Control-Allow-Origin` value for a request. Only the
//! header is touched: no preflight handling, requests are never rejected.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

pub const WILDCARD_ORIGIN: &str = "*";

/// Process-wide allow-list, read-only after startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    /// No allow-list configured: never emit the header
    Disabled,
    /// Allow-list contains `*`
    Any,
    /// Exact-match allow-list
    List(HashSet<String>),
}

impl OriginPolicy {
    pub fn from_config(allowed_origins: Option<&[String]>) -> Self {
        match allowed_origins {
            None => OriginPolicy::Disabled,
            Some(origins) if origins.iter().any(|o| o == WILDCARD_ORIGIN) => OriginPolicy::Any,
            Some(origins) => OriginPolicy::List(origins.iter().cloned().collect()),
        }
    }

    /// Header value for a request carrying `origin`, if any. An empty
    /// `Origin` header counts as absent.
    pub fn allow_header<'a>(&self, origin: Option<&'a str>) -> Option<&'a str> {
        let origin = origin.filter(|o| !o.is_empty())?;
        match self {
            OriginPolicy::Disabled => None,
            OriginPolicy::Any => Some(WILDCARD_ORIGIN),
            OriginPolicy::List(allowed) => allowed.contains(origin).then_some(origin),
        }
    }
}

/// Middleware applying [`OriginPolicy`] to every response
pub async fn allow_origin(
    State(policy): State<Arc<OriginPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut response = next.run(request).await;

    if let Some(value) = policy
        .allow_header(origin.as_deref())
        .and_then(|v| HeaderValue::from_str(v).ok())
    {
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    response
}
