//! # Response Cache
//!
//! Cache-aware response writing. The error pipeline hands a content type,
//! payload, status code and TTL to [`send_cached`]; the response it gets
//! back is tagged with a [`CacheDirective`] which the [`response_cache`]
//! middleware uses to store the response in a [`ResponseCache`].
//!
//! The core never touches the store. Keying and expiry live entirely in
//! this module.

mod middleware;
mod store;
mod writer;

use std::time::Duration;

pub use middleware::{fingerprint, response_cache, CACHE_STATUS_HEADER};
pub use store::{purge_periodically, CachedResponse, MemoryResponseCache, ResponseCache};
pub use writer::{send_cached, send_json_cached, CacheDirective, CacheOptions};

/// Cache duration bucket for error responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TtlClass {
    /// Not-found pages
    Page404,
    /// Upstream timeouts
    PageTimeout,
    /// Every other error
    PageOtherError,
}

impl TtlClass {
    /// Bucket for a final HTTP status code
    pub fn for_status(code: u16) -> Self {
        match code {
            404 => TtlClass::Page404,
            408 => TtlClass::PageTimeout,
            _ => TtlClass::PageOtherError,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TtlClass::Page404 => "PAGE_404",
            TtlClass::PageTimeout => "PAGE_TIMEOUT",
            TtlClass::PageOtherError => "PAGE_OTHER_ERROR",
        }
    }
}

/// Configured duration per [`TtlClass`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub page_404: Duration,
    pub page_timeout: Duration,
    pub page_other_error: Duration,
}

impl CacheTtls {
    pub fn for_class(&self, class: TtlClass) -> Duration {
        match class {
            TtlClass::Page404 => self.page_404,
            TtlClass::PageTimeout => self.page_timeout,
            TtlClass::PageOtherError => self.page_other_error,
        }
    }
}
