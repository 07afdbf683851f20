//! Response cache store
//!
//! The store is keyed by an opaque request fingerprint. Entries expire
//! after their TTL; there is no other eviction.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use chrono::{DateTime, Utc};

/// A stored response: status, content type, cache lifetime header and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub body: Bytes,
}

impl CachedResponse {
    /// Rebuild an HTTP response from the stored parts
    pub fn to_response(&self) -> Response {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        for (name, value) in [
            (CONTENT_TYPE, self.content_type.as_deref()),
            (CACHE_CONTROL, self.cache_control.as_deref()),
        ] {
            if let Some(value) = value.and_then(|v| HeaderValue::from_str(v).ok()) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}

/// Shared response cache
pub trait ResponseCache: Send + Sync {
    /// Fetch a live entry
    fn get(&self, key: &str) -> Option<CachedResponse>;

    /// Store an entry for `ttl`. A zero TTL stores nothing.
    fn put(&self, key: &str, response: CachedResponse, ttl: Duration);
}

#[derive(Debug)]
struct Entry {
    response: CachedResponse,
    expires_at: DateTime<Utc>,
}

/// In-process response cache
#[derive(Debug, Default)]
pub struct MemoryResponseCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry
    pub fn purge_expired(&self) {
        let now = Utc::now();
        if let Ok(mut map) = self.entries.write() {
            map.retain(|_, entry| entry.expires_at > now);
        }
    }

    fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<CachedResponse> {
        {
            let map = self.entries.read().ok()?;
            let entry = map.get(key)?;
            if entry.expires_at > now {
                return Some(entry.response.clone());
            }
        }

        // Lazily drop the expired entry
        if let Ok(mut map) = self.entries.write() {
            if map.get(key).is_some_and(|entry| entry.expires_at <= now) {
                map.remove(key);
            }
        }
        None
    }

    fn put_at(&self, key: &str, response: CachedResponse, ttl: Duration, now: DateTime<Utc>) {
        if ttl.is_zero() {
            return;
        }
        let Some(expires_at) = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
        else {
            return;
        };

        if let Ok(mut map) = self.entries.write() {
            map.insert(key.to_string(), Entry { response, expires_at });
        }
    }
}

impl ResponseCache for MemoryResponseCache {
    fn get(&self, key: &str) -> Option<CachedResponse> {
        self.get_at(key, Utc::now())
    }

    fn put(&self, key: &str, response: CachedResponse, ttl: Duration) {
        self.put_at(key, response, ttl, Utc::now());
    }
}

/// Drop expired entries every `period`. Runs until the task is cancelled.
pub async fn purge_periodically(
    cache: Arc<MemoryResponseCache>,
    period: Duration,
) -> Result<(), Infallible> {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        cache.purge_expired();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: u16) -> CachedResponse {
        CachedResponse {
            status,
            content_type: Some("application/json".to_string()),
            cache_control: Some("max-age=60".to_string()),
            body: Bytes::from_static(b"{}"),
        }
    }

    #[test]
    fn test_put_then_get() {
        let cache = MemoryResponseCache::new();
        cache.put("k", entry(404), Duration::from_secs(60));

        assert_eq!(cache.get("k"), Some(entry(404)));
        assert_eq!(cache.get("other"), None);
    }

    #[test]
    fn test_zero_ttl_not_stored() {
        let cache = MemoryResponseCache::new();
        cache.put("k", entry(500), Duration::ZERO);

        assert!(cache.is_empty());
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_expired_entry_dropped_on_read() {
        let cache = MemoryResponseCache::new();
        let stored_at = Utc::now() - chrono::Duration::seconds(120);
        cache.put_at("k", entry(408), Duration::from_secs(60), stored_at);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired_keeps_live_entries() {
        let cache = MemoryResponseCache::new();
        let long_ago = Utc::now() - chrono::Duration::hours(1);
        cache.put_at("old", entry(500), Duration::from_secs(60), long_ago);
        cache.put("fresh", entry(404), Duration::from_secs(60));

        cache.purge_expired();

        assert_eq!(cache.len(), 1);
        assert!(cache.get("fresh").is_some());
    }

    #[test]
    fn test_to_response_replays_parts() {
        let response = entry(410).to_response();
        assert_eq!(response.status(), StatusCode::GONE);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[CACHE_CONTROL], "max-age=60");
    }

    #[test]
    fn test_to_response_skips_missing_headers() {
        let stored = CachedResponse {
            status: 404,
            content_type: None,
            cache_control: None,
            body: Bytes::new(),
        };
        let response = stored.to_response();

        assert!(response.headers().get(CONTENT_TYPE).is_none());
        assert!(response.headers().get(CACHE_CONTROL).is_none());
    }
}
