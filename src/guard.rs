//! Uncaught-failure guard
//!
//! Top-level supervisory boundary for work that runs outside any request:
//! the server loop itself and background tasks. A supervised task that
//! errors or panics is logged and dropped; the process keeps running.

use std::any::Any;
use std::fmt;
use std::future::Future;

use crate::observability::{log_event, Event};

/// Run `task` on its own tokio task and contain whatever goes wrong.
///
/// Returns the task's value, or `None` after logging when it failed,
/// panicked or was cancelled. With `debug` the log carries the full
/// `Debug` rendering instead of the display message.
pub async fn supervise<F, T, E>(name: &str, debug: bool, task: F) -> Option<T>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: fmt::Display + fmt::Debug + Send + 'static,
{
    match tokio::spawn(task).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(err)) => {
            report(name, debug, &err.to_string(), &format!("{:?}", err));
            None
        }
        Err(join_err) if join_err.is_panic() => {
            let message = panic_message(&*join_err.into_panic());
            report(name, debug, &message, &format!("panic: {}", message));
            None
        }
        Err(join_err) => {
            report(name, debug, "task cancelled", &join_err.to_string());
            None
        }
    }
}

fn report(task: &str, debug: bool, message: &str, detail: &str) {
    let text = if debug { detail } else { message };
    log_event(Event::UncaughtFailure, &[("task", task), ("message", text)]);
}

/// Best-effort text of a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
