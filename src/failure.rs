//! # Request Failures
//!
//! The value every domain handler returns on failure. A `Failure` is built
//! while handling one request and consumed exactly once by the error
//! pipeline (`http_server::pipeline`).
//!
//! Handlers return `Result<T, Failure>`; the `IntoResponse` impl parks the
//! failure in the response extensions so the pipeline, which knows the
//! requested format and the configured TTLs, can render it.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// A failure raised during request handling
#[derive(Debug, Clone)]
pub enum Failure {
    /// Explicit not-found signal. Always answered with 404.
    NotFound {
        message: String,
        messages: Vec<String>,
    },

    /// Anything else. The status is taken from `code` when present and
    /// otherwise sniffed from the message text.
    Generic {
        message: String,
        code: Option<u16>,
        messages: Vec<String>,
        cause: Option<Arc<dyn Error + Send + Sync>>,
    },
}

impl Failure {
    /// Not-found failure with the given message
    pub fn not_found(message: impl Into<String>) -> Self {
        Failure::NotFound {
            message: message.into(),
            messages: Vec::new(),
        }
    }

    /// Generic failure without an explicit status code
    pub fn generic(message: impl Into<String>) -> Self {
        Failure::Generic {
            message: message.into(),
            code: None,
            messages: Vec::new(),
            cause: None,
        }
    }

    /// Attach an explicit status code. Ignored for `NotFound`.
    pub fn with_code(mut self, status: u16) -> Self {
        if let Failure::Generic { code, .. } = &mut self {
            *code = Some(status);
        }
        self
    }

    /// Attach ordered sub-messages (per-subsystem diagnostics).
    pub fn with_messages<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines.into_iter().map(Into::into).collect();
        match &mut self {
            Failure::NotFound { messages, .. } | Failure::Generic { messages, .. } => {
                *messages = lines;
            }
        }
        self
    }

    /// Keep the underlying error for verbose logging. Ignored for `NotFound`.
    pub fn with_cause<E>(mut self, err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        if let Failure::Generic { cause, .. } = &mut self {
            *cause = Some(Arc::new(err));
        }
        self
    }

    pub fn message(&self) -> &str {
        match self {
            Failure::NotFound { message, .. } | Failure::Generic { message, .. } => message,
        }
    }

    pub fn messages(&self) -> &[String] {
        match self {
            Failure::NotFound { messages, .. } | Failure::Generic { messages, .. } => messages,
        }
    }

    /// The explicit status code, if one was attached
    pub fn code(&self) -> Option<u16> {
        match self {
            Failure::NotFound { .. } => Some(404),
            Failure::Generic { code, .. } => *code,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Failure::NotFound { .. })
    }

    /// Full diagnostic rendering: kind, code, message, sub-messages and
    /// the cause chain, one item per line.
    pub fn detail(&self) -> String {
        let mut out = match self {
            Failure::NotFound { message, .. } => format!("NotFound: {}", message),
            Failure::Generic { message, code, .. } => match code {
                Some(code) => format!("Generic({}): {}", code, message),
                None => format!("Generic: {}", message),
            },
        };

        for line in self.messages() {
            out.push_str("\n  - ");
            out.push_str(line);
        }

        let mut source = self.source();
        while let Some(err) = source {
            out.push_str("\ncaused by: ");
            out.push_str(&err.to_string());
            source = err.source();
        }

        out
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl Error for Failure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Failure::Generic {
                cause: Some(cause), ..
            } => Some(&**cause as &(dyn Error + 'static)),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        Failure::generic(err.to_string()).with_cause(err)
    }
}

impl From<serde_json::Error> for Failure {
    fn from(err: serde_json::Error) -> Self {
        Failure::generic(err.to_string()).with_cause(err)
    }
}

impl IntoResponse for Failure {
    /// Placeholder 500 carrying the failure. The error pipeline middleware
    /// replaces it with the rendered, cacheable error response.
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self);
        response
    }
}
