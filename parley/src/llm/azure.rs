//! Azure OpenAI Chat Completions client implementing [`CompletionClient`].
//!
//! Requests go to `{endpoint}/openai/deployments/{deployment}/chat/completions`
//! with the fixed `api-version` query parameter and the `api-key` header. The
//! message list is forwarded unmodified with [`TEMPERATURE`] and [`MAX_TOKENS`];
//! the first choice's content is returned.
//!
//! Request and response bodies carry full user content, so they are only logged at
//! `trace` level.
//!
//! The client makes exactly one attempt per call: async-openai's default retry on
//! 429/5xx is replaced by a backoff that gives up immediately.

use async_openai::{
    config::AzureConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, trace};

use crate::llm::{AzureSettings, CompletionClient, CompletionError, MAX_TOKENS, TEMPERATURE};
use crate::message::{ChatMessage, Role};

/// Backoff whose elapsed-time budget is already spent after the first attempt.
fn single_attempt() -> backoff::ExponentialBackoff {
    backoff::ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

/// Azure OpenAI chat client. Construct once per process and share behind an `Arc`.
pub struct AzureChatClient {
    client: Client<AzureConfig>,
    deployment: String,
}

impl AzureChatClient {
    pub fn new(settings: &AzureSettings) -> Self {
        let config = AzureConfig::new()
            .with_api_base(settings.endpoint.clone())
            .with_api_key(settings.api_key.clone())
            .with_deployment_id(settings.deployment.clone())
            .with_api_version(settings.api_version.clone());
        Self {
            client: Client::with_config(config).with_backoff(single_attempt()),
            deployment: settings.deployment.clone(),
        }
    }

    fn messages_to_request(messages: &[ChatMessage]) -> Vec<ChatCompletionRequestMessage> {
        messages
            .iter()
            .map(|m| match m.role {
                Role::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(m.content.as_str()),
                ),
                Role::Assistant => ChatCompletionRequestMessage::Assistant(m.content.as_str().into()),
            })
            .collect()
    }
}

#[async_trait]
impl CompletionClient for AzureChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let trace_id = uuid::Uuid::new_v4().to_string();
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.deployment.clone());
        args.messages(Self::messages_to_request(messages));
        args.temperature(TEMPERATURE);
        #[allow(deprecated)]
        args.max_tokens(MAX_TOKENS);

        let request = args
            .build()
            .map_err(|e| CompletionError::Build(e.to_string()))?;

        debug!(
            trace_id = %trace_id,
            deployment = %self.deployment,
            message_count = messages.len(),
            "Azure chat create"
        );
        if let Ok(js) = serde_json::to_string_pretty(&request) {
            trace!(trace_id = %trace_id, request = %js, "Azure request body");
        }

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| CompletionError::Upstream(e.to_string()))?;

        if let Ok(js) = serde_json::to_string_pretty(&response) {
            trace!(trace_id = %trace_id, response = %js, "Azure response body");
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::Malformed("no choices returned".to_string()))?;
        choice
            .message
            .content
            .ok_or_else(|| CompletionError::Malformed("first choice has no content".to_string()))
    }
}
