//! # HTTP Server
//!
//! Builds the router and owns the listener.
//!
//! Layer order, outermost first:
//!
//! 1. origin policy (`Access-Control-Allow-Origin`)
//! 2. `X-Powered-By`
//! 3. response cache
//! 4. error pipeline
//! 5. panic catcher
//!
//! so cached error responses still get per-request origin headers, and a
//! panicking handler is rendered like any other failure.

use std::io;
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::cache::{response_cache, MemoryResponseCache, ResponseCache};
use crate::observability::{log_event, Event};

use super::config::ServerConfig;
use super::origin::allow_origin;
use super::pipeline::{error_pipeline, panic_to_failure};
use super::routes::{builtin_routes, not_found_fallback};
use super::state::AppState;

pub const POWERED_BY_HEADER: HeaderName = HeaderName::from_static("x-powered-by");
pub const POWERED_BY: &str = "Iframely";

pub struct HttpServer {
    state: AppState,
    routes: Router<AppState>,
}

impl HttpServer {
    /// Server with an in-memory response cache
    pub fn new(config: ServerConfig) -> Self {
        Self::with_cache(config, Arc::new(MemoryResponseCache::new()))
    }

    pub fn with_cache(config: ServerConfig, cache: Arc<dyn ResponseCache>) -> Self {
        Self {
            state: AppState::new(config, cache),
            routes: builtin_routes(),
        }
    }

    /// Merge domain routes. Handlers report failures by returning
    /// `Err(Failure)`; the error pipeline renders them.
    pub fn with_routes(mut self, routes: Router<AppState>) -> Self {
        self.routes = self.routes.merge(routes);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn socket_addr(&self) -> String {
        self.state.config.socket_addr()
    }

    /// Get the fully layered router (for testing)
    pub fn router(self) -> Router {
        Self::build_router(self.routes, self.state)
    }

    fn build_router(routes: Router<AppState>, state: AppState) -> Router {
        routes
            .fallback(not_found_fallback)
            .layer(CatchPanicLayer::custom(panic_to_failure))
            .layer(middleware::from_fn_with_state(state.clone(), error_pipeline))
            .layer(middleware::from_fn_with_state(
                state.cache.clone(),
                response_cache,
            ))
            .layer(SetResponseHeaderLayer::overriding(
                POWERED_BY_HEADER,
                HeaderValue::from_static(POWERED_BY),
            ))
            .layer(middleware::from_fn_with_state(
                state.origins.clone(),
                allow_origin,
            ))
            .with_state(state)
    }

    /// Bind and serve until Ctrl-C
    pub async fn start(self) -> io::Result<()> {
        let addr = self.socket_addr();
        let listener = TcpListener::bind(addr.as_str()).await?;
        let bound = listener.local_addr()?.to_string();
        log_event(Event::ServerListening, &[("addr", bound.as_str())]);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete, &[]);
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available: run until the process is killed
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let server = HttpServer::new(ServerConfig::default());
        assert_eq!(server.socket_addr(), "0.0.0.0:8061");
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(ServerConfig::with_port(8080));
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_state_carries_origin_policy() {
        let config = ServerConfig {
            allowed_origins: Some(vec!["*".to_string()]),
            ..Default::default()
        };
        let server = HttpServer::new(config);
        assert_eq!(
            server.state().origins.allow_header(Some("https://a.com")),
            Some("*")
        );
    }

    #[test]
    fn test_router_builds() {
        let _router = HttpServer::new(ServerConfig::default()).router();
    }
}
