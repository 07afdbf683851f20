//! Shared application state
//!
//! Everything here is built once at startup and only read afterwards.

use std::sync::Arc;

use crate::cache::ResponseCache;

use super::config::ServerConfig;
use super::origin::OriginPolicy;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub cache: Arc<dyn ResponseCache>,
    pub origins: Arc<OriginPolicy>,
}

impl AppState {
    pub fn new(config: ServerConfig, cache: Arc<dyn ResponseCache>) -> Self {
        let origins = OriginPolicy::from_config(config.allowed_origins.as_deref());
        Self {
            config: Arc::new(config),
            cache,
            origins: Arc::new(origins),
        }
    }
}
