//! # HTTP Server Module
//!
//! Boundary layer of the embed service: origin policy, product header,
//! response cache and the error pipeline wrapped around domain routes.
//!
//! # Endpoints
//!
//! - `/` - Redirect to the configured home page
//! - `/health` - Health check
//! - anything else - Domain routes merged via [`HttpServer::with_routes`],
//!   or the 404 error document

pub mod config;
pub mod origin;
pub mod pipeline;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use origin::OriginPolicy;
pub use pipeline::respond_with_error;
pub use server::HttpServer;
pub use state::AppState;
