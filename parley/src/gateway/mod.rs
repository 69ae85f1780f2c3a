//! Completion Gateway: translates a role/content list into one upstream completion call.
//!
//! [`Gateway`] is what the session controller talks to. Two implementations:
//!
//! - [`CompletionGateway`]: in-process, wraps an injected [`CompletionClient`]. The
//!   server route is a thin layer over this.
//! - [`HttpGateway`]: posts to the server's `/api/chat` route, as a browser front end would.

mod http;

pub use http::HttpGateway;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use crate::llm::CompletionClient;
use crate::message::ChatMessage;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("messages must not be empty")]
    EmptyMessages,
    /// Upstream completion failed; carries the underlying detail.
    #[error("{0}")]
    Upstream(String),
    /// The completion route answered with a non-success status.
    #[error("Failed to fetch response (status {status}): {details}")]
    Status { status: u16, details: String },
    /// The completion route could not be reached or its body was unreadable.
    #[error("Failed to fetch response: {0}")]
    Transport(String),
}

impl GatewayError {
    /// Human-readable detail for the failure body.
    pub fn details(&self) -> String {
        self.to_string()
    }
}

/// One completion per call: messages in, first generated message's text out.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GatewayError>;
}

/// In-process gateway over a single injected client, constructed once and shared.
///
/// Holds no state between calls.
#[derive(Clone)]
pub struct CompletionGateway {
    client: Arc<dyn CompletionClient>,
}

impl CompletionGateway {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Gateway for CompletionGateway {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        if messages.is_empty() {
            return Err(GatewayError::EmptyMessages);
        }
        debug!(message_count = messages.len(), "gateway complete");
        trace!(messages = ?messages, "gateway inbound messages");
        match self.client.complete(messages).await {
            Ok(content) => {
                trace!(content = %content, "gateway outbound response");
                Ok(content)
            }
            Err(e) => {
                warn!("completion failed: {}", e);
                Err(GatewayError::Upstream(e.to_string()))
            }
        }
    }
}
