//! Wire types for the completion route (`POST /api/chat`).
//!
//! - Request: `{ "messages": [{ "role", "content" }, ...] }`
//! - Success (200): `{ "content": "..." }`
//! - Failure (500): `{ "error": "Failed to process request", "details": "..." }`

use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;

/// Path of the completion route.
pub const CHAT_ROUTE: &str = "/api/chat";

/// `error` field of every failure body.
pub const FAILURE_ERROR: &str = "Failed to process request";

/// Body of `POST /api/chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
}

/// Success body: text of the first generated choice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
}

/// Failure body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl ErrorResponse {
    /// Failure body with the fixed `error` text and the given detail.
    pub fn failed(details: impl Into<String>) -> Self {
        Self {
            error: FAILURE_ERROR.to_string(),
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wire_format() {
        let req = CompletionRequest {
            messages: vec![ChatMessage::user("Hello")],
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"messages":[{"role":"user","content":"Hello"}]}"#
        );
    }

    #[test]
    fn error_wire_format() {
        let body = ErrorResponse::failed("boom");
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["error"], "Failed to process request");
        assert_eq!(v["details"], "boom");
    }
}
