//! Observable events
//!
//! Events are explicit and typed; the string form is what lands in the
//! `event` field of a log line.

use std::fmt;

use super::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Process startup begins
    ServerStart,
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Listener bound, ready to serve
    ServerListening,
    /// Graceful shutdown finished
    ShutdownComplete,

    // Request pipeline
    /// A request ended in a failure and went through the error pipeline
    RequestFailed,
    /// An error document could not be rendered in the requested format
    RenderFailed,
    /// A cacheable response body could not be buffered
    CacheStoreFailed,

    // Supervision
    /// A failure escaped a supervised task (or a handler panicked)
    UncaughtFailure,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ServerStart => "SERVER_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ServerListening => "SERVER_LISTENING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::RequestFailed => "REQUEST_FAILED",
            Event::RenderFailed => "RENDER_FAILED",
            Event::CacheStoreFailed => "CACHE_STORE_FAILED",
            Event::UncaughtFailure => "UNCAUGHT_FAILURE",
        }
    }

    /// Default severity when the event is logged through `log_event`.
    pub fn severity(&self) -> Severity {
        match self {
            Event::RequestFailed | Event::RenderFailed | Event::UncaughtFailure => {
                Severity::Error
            }
            Event::CacheStoreFailed => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
