//! Error response document
//!
//! `{"error":{"source":"iframely","code":404,"message":"...","messages":[...]}}`

use serde::{Deserialize, Serialize};

use crate::classify::Classification;

/// Value of `error.source` in every error body
pub const ERROR_SOURCE: &str = "iframely";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponseDocument {
    pub error: ErrorBody,
}

/// Field order here is the serialized field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub source: String,
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<String>>,
}

impl ErrorResponseDocument {
    /// An empty sub-message list is dropped so `messages` only appears
    /// when there is something in it.
    pub fn new(code: u16, message: impl Into<String>, messages: Option<Vec<String>>) -> Self {
        Self {
            error: ErrorBody {
                source: ERROR_SOURCE.to_string(),
                code,
                message: message.into(),
                messages: messages.filter(|m| !m.is_empty()),
            },
        }
    }

    pub fn code(&self) -> u16 {
        self.error.code
    }
}

impl From<Classification> for ErrorResponseDocument {
    fn from(classification: Classification) -> Self {
        Self::new(
            classification.code,
            classification.message,
            classification.messages,
        )
    }
}
