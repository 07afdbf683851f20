//! # Error Classifier
//!
//! Maps a [`Failure`] to the external error contract: status code,
//! client-facing message, optional sub-messages and cache TTL class.
//!
//! Classification is pure: the same failure always yields the same
//! result.

use crate::cache::TtlClass;
use crate::failure::Failure;

/// Status markers sniffed from free-text messages, in match order.
/// Later markers win when several are present.
pub const SNIFFED_STATUS_CODES: [u16; 3] = [401, 403, 408];

/// Status used when no valid code can be resolved
pub const DEFAULT_STATUS: u16 = 500;

/// Result of classifying a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub code: u16,
    pub message: String,
    /// `None` when the failure carried no sub-messages
    pub messages: Option<Vec<String>>,
    pub ttl_class: TtlClass,
}

pub fn classify(failure: &Failure) -> Classification {
    match failure {
        Failure::NotFound { message, messages } => Classification {
            code: 404,
            message: message.clone(),
            messages: non_empty(messages),
            ttl_class: TtlClass::Page404,
        },
        Failure::Generic {
            message,
            code,
            messages,
            ..
        } => {
            let explicit = code
                .filter(|c| (100..=999).contains(c))
                .unwrap_or(DEFAULT_STATUS);
            let (code, text) = status_message(sniff_status_code(message, explicit), message);

            Classification {
                code,
                message: text,
                messages: non_empty(messages),
                ttl_class: TtlClass::for_status(code),
            }
        }
    }
}

/// Override `code` with any status marker found verbatim in `message`.
///
/// Lower layers sometimes report a status only as text ("HTTP 403 from
/// upstream"). Each marker in [`SNIFFED_STATUS_CODES`] that occurs as a
/// substring replaces the current code, so the last matching marker in
/// that order wins. Unrelated digits match too ("user id 401 missing").
pub fn sniff_status_code(message: &str, code: u16) -> u16 {
    SNIFFED_STATUS_CODES
        .iter()
        .fold(code, |code, &marker| {
            if message.contains(marker.to_string().as_str()) {
                marker
            } else {
                code
            }
        })
}

/// Client-facing message for a resolved status. 401 is answered as 403
/// so browsers don't pop a credentials prompt.
fn status_message(code: u16, message: &str) -> (u16, String) {
    match code {
        400 if message.is_empty() => (400, "Bad Request".to_string()),
        400 => (400, format!("Bad Request: {}", message)),
        401 => (403, "Unauthorized".to_string()),
        403 => (403, "Forbidden".to_string()),
        404 => (404, "Not found".to_string()),
        408 => (408, "Timeout".to_string()),
        410 => (410, "Gone".to_string()),
        415 | 417 if message.is_empty() => (code, "Unsupported Media Type".to_string()),
        415 | 417 => (code, message.to_string()),
        _ => (code, "Server error".to_string()),
    }
}

fn non_empty(messages: &[String]) -> Option<Vec<String>> {
    if messages.is_empty() {
        None
    } else {
        Some(messages.to_vec())
    }
}
