//! HTTP Server Configuration
//!
//! Built once at startup and shared read-only through `AppState`. Loaded
//! from a JSON file; every key has a default. Upper-case aliases match the
//! names used by existing deployment configs.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::CacheTtls;

/// Longest accepted cache TTL (one year)
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8061)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Where `GET /` redirects
    #[serde(default = "default_home_url", alias = "homeUrl")]
    pub home_url: String,

    /// Origins allowed to read responses cross-origin. `None` disables the
    /// header entirely; `["*"]` allows everyone.
    #[serde(default, alias = "allowedOrigins")]
    pub allowed_origins: Option<Vec<String>>,

    /// Cache TTL for 404 error responses, in seconds
    #[serde(default = "default_ttl_page_404", alias = "CACHE_TTL_PAGE_404")]
    pub cache_ttl_page_404: u64,

    /// Cache TTL for timeout (408) error responses, in seconds
    #[serde(default = "default_ttl_page_timeout", alias = "CACHE_TTL_PAGE_TIMEOUT")]
    pub cache_ttl_page_timeout: u64,

    /// Cache TTL for every other error response, in seconds
    #[serde(
        default = "default_ttl_page_other_error",
        alias = "CACHE_TTL_PAGE_OTHER_ERROR"
    )]
    pub cache_ttl_page_other_error: u64,

    /// Log full failure detail instead of just the message
    #[serde(default, alias = "RICH_LOG_ENABLED")]
    pub rich_log_enabled: bool,

    /// Log full detail for failures caught by the supervisor
    #[serde(default, alias = "DEBUG")]
    pub debug: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8061
}

fn default_home_url() -> String {
    "https://iframely.com".to_string()
}

fn default_ttl_page_404() -> u64 {
    600
}

fn default_ttl_page_timeout() -> u64 {
    60
}

fn default_ttl_page_other_error() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            home_url: default_home_url(),
            allowed_origins: None,
            cache_ttl_page_404: default_ttl_page_404(),
            cache_ttl_page_timeout: default_ttl_page_timeout(),
            cache_ttl_page_other_error: default_ttl_page_other_error(),
            rich_log_enabled: false,
            debug: false,
        }
    }
}

impl ServerConfig {
    /// Create a default config listening on `port`
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }

        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be > 0".to_string()));
        }

        if !(self.home_url.starts_with("http://") || self.home_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "home_url must be an absolute http(s) URL, got '{}'",
                self.home_url
            )));
        }

        if let Some(origins) = &self.allowed_origins {
            if origins.iter().any(|o| o.trim().is_empty()) {
                return Err(ConfigError::Invalid(
                    "allowed_origins must not contain empty entries".to_string(),
                ));
            }
        }

        for (key, ttl) in [
            ("cache_ttl_page_404", self.cache_ttl_page_404),
            ("cache_ttl_page_timeout", self.cache_ttl_page_timeout),
            ("cache_ttl_page_other_error", self.cache_ttl_page_other_error),
        ] {
            if ttl > MAX_CACHE_TTL_SECS {
                return Err(ConfigError::Invalid(format!(
                    "{} must be <= {} seconds",
                    key, MAX_CACHE_TTL_SECS
                )));
            }
        }

        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cache_ttls(&self) -> CacheTtls {
        CacheTtls {
            page_404: Duration::from_secs(self.cache_ttl_page_404),
            page_timeout: Duration::from_secs(self.cache_ttl_page_timeout),
            page_other_error: Duration::from_secs(self.cache_ttl_page_other_error),
        }
    }
}
