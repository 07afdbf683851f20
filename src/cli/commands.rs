//! CLI command implementations

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{purge_periodically, MemoryResponseCache};
use crate::guard::supervise;
use crate::http_server::{HttpServer, ServerConfig};
use crate::observability::{log_event, Event};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// How often expired cache entries are swept
const CACHE_PURGE_PERIOD: Duration = Duration::from_secs(60);

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(config.as_deref()),
        Command::CheckConfig { config } => check_config(config.as_deref()),
    }
}

/// Load the config file, or defaults when no path was given
pub fn load_config(config_path: Option<&Path>) -> CliResult<ServerConfig> {
    let config = match config_path {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };

    let source = config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    log_event(Event::ConfigLoaded, &[("source", source.as_str())]);

    Ok(config)
}

/// Start the HTTP server.
///
/// The server loop and the cache sweeper run under the supervisory
/// guard; a failure in either is logged, never propagated as a crash.
pub fn serve(config_path: Option<&Path>) -> CliResult<()> {
    log_event(Event::ServerStart, &[]);

    let config = load_config(config_path)?;
    let debug = config.debug;

    let cache = Arc::new(MemoryResponseCache::new());
    let server = HttpServer::with_cache(config, cache.clone());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async move {
        tokio::spawn(supervise(
            "cache_purge",
            debug,
            purge_periodically(cache, CACHE_PURGE_PERIOD),
        ));
        supervise("http_server", debug, server.start()).await
    })
    .ok_or_else(|| CliError::boot_failed("HTTP server stopped on an error"))
}

/// Validate configuration and print the effective values
pub fn check_config(config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    write_response(&config)
}
