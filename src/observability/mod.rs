//! Observability for embedgate
//!
//! Structured JSON logging with typed lifecycle events.
//!
//! ```ignore
//! use embedgate::observability::{log_event, Event, Logger};
//!
//! log_event(Event::ServerStart, &[]);
//! Logger::warn("SLOW_UPSTREAM", &[("ms", "2400")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle or pipeline event at its default severity.
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_does_not_panic() {
        log_event(Event::ServerStart, &[]);
        log_event(Event::ConfigLoaded, &[("path", "/tmp/embedgate.json")]);
    }
}
