//! # Error Pipeline
//!
//! Terminal stage for every failed request:
//!
//! 1. log the failure (full detail when `rich_log_enabled`)
//! 2. classify it
//! 3. build the error document
//! 4. render it in the requested format
//! 5. send it through the cache-aware writer with the class TTL
//!
//! Handlers never build error responses themselves. They return a
//! [`Failure`], which this middleware picks out of the response
//! extensions.

use std::any::Any;

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::header::ALLOW;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::cache::{send_cached, send_json_cached, CacheDirective, CacheOptions};
use crate::classify::classify;
use crate::failure::Failure;
use crate::guard::panic_message;
use crate::observability::{log_event, Event};
use crate::response::{render, ErrorResponseDocument, ResponseFormat};

use super::config::ServerConfig;
use super::state::AppState;

/// Largest bare error body read back as a failure message
const MAX_BARE_ERROR_BODY: usize = 64 * 1024;

/// Middleware converting a parked [`Failure`] into the error response
pub async fn error_pipeline(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let format = ResponseFormat::from_uri(request.uri());
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let mut response = next.run(request).await;
    let parked = response.extensions_mut().remove::<Failure>();
    match parked {
        Some(failure) => {
            log_failure(&failure, state.config.rich_log_enabled, method.as_str(), &path);
            respond_with_error(&state.config, &failure, format)
        }
        None if is_bare_error(&response) => {
            let allow = response.headers().get(ALLOW).cloned();
            let failure = failure_from_response(response).await;
            log_failure(&failure, state.config.rich_log_enabled, method.as_str(), &path);

            let mut rendered = respond_with_error(&state.config, &failure, format);
            if let Some(allow) = allow {
                rendered.headers_mut().insert(ALLOW, allow);
            }
            rendered
        }
        None => response,
    }
}

/// An error status produced outside the pipeline: extractor rejections,
/// 405 from the method router, handlers returning a bare status.
fn is_bare_error(response: &Response) -> bool {
    let status = response.status();
    (status.is_client_error() || status.is_server_error())
        && response.extensions().get::<CacheDirective>().is_none()
}

/// Rebuild a generic failure from a bare error response. The body text
/// (the rejection message) becomes the failure message.
async fn failure_from_response(response: Response) -> Failure {
    let status = response.status().as_u16();
    let message = match to_bytes(response.into_body(), MAX_BARE_ERROR_BODY).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };
    Failure::generic(message).with_code(status)
}

/// Classify, render and send `failure`
pub fn respond_with_error(config: &ServerConfig, failure: &Failure, format: ResponseFormat) -> Response {
    let classification = classify(failure);
    let options = CacheOptions {
        code: classification.code,
        ttl: config.cache_ttls().for_class(classification.ttl_class),
    };
    let document = ErrorResponseDocument::from(classification);

    match render(&document, format) {
        Ok(rendered) => send_cached(rendered.content_type, rendered.body, options),
        Err(err) => {
            let error = err.to_string();
            log_event(
                Event::RenderFailed,
                &[("error", error.as_str()), ("format", format.content_type())],
            );
            send_json_cached(&document, options)
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

fn log_failure(failure: &Failure, rich: bool, method: &str, path: &str) {
    if rich {
        let detail = failure.detail();
        log_event(
            Event::RequestFailed,
            &[("method", method), ("path", path), ("detail", detail.as_str())],
        );
    } else {
        log_event(
            Event::RequestFailed,
            &[("method", method), ("path", path), ("message", failure.message())],
        );
    }
}

/// `CatchPanicLayer` hook: a panicking handler becomes a generic failure
pub fn panic_to_failure(panic: Box<dyn Any + Send + 'static>) -> Response {
    Failure::generic(format!("handler panicked: {}", panic_message(&*panic))).into_response()
}
