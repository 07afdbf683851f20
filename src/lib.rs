//! embedgate - HTTP boundary layer for an embed-metadata service
//!
//! Turns any failure raised while handling a request into a classified,
//! cacheable JSON or XML error response, and applies the cross-origin
//! policy to everything it serves.

pub mod cache;
pub mod classify;
pub mod cli;
pub mod failure;
pub mod guard;
pub mod http_server;
pub mod observability;
pub mod response;

pub use failure::Failure;
