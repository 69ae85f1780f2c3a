//! Completion client abstraction for the gateway.
//!
//! [`CompletionGateway`](crate::gateway::CompletionGateway) depends on a callable that
//! turns a role/content list into the first generated message's text; this module
//! defines the trait, the Azure OpenAI implementation and a mock.

mod azure;
mod mock;
mod settings;

pub use azure::AzureChatClient;
pub use mock::MockCompletion;
pub use settings::{AzureSettings, SettingsError, AZURE_API_VERSION};

use async_trait::async_trait;

use crate::message::ChatMessage;

/// Sampling temperature sent with every completion request.
pub const TEMPERATURE: f32 = 0.7;

/// Maximum output tokens sent with every completion request.
pub const MAX_TOKENS: u32 = 800;

/// Error from a [`CompletionClient`] call.
///
/// Display is the human-readable detail the gateway passes on to callers.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The request could not be constructed (e.g. invalid configuration).
    #[error("request build failed: {0}")]
    Build(String),
    /// Transport failure or non-success status from the provider.
    #[error("upstream API error: {0}")]
    Upstream(String),
    /// The provider answered but the body had no usable first choice.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Completion client: given messages, returns the text of the first generated choice.
///
/// Implementations: [`AzureChatClient`] (real API), [`MockCompletion`] (fixed reply).
/// No retry and no timeout override: one call, one result.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}
