//! Gateway that calls the server's completion route over HTTP.

use async_trait::async_trait;

use crate::gateway::{Gateway, GatewayError};
use crate::message::ChatMessage;
use crate::protocol::{CompletionRequest, CompletionResponse, ErrorResponse, CHAT_ROUTE};

/// Posts `{ messages }` to `<base_url>/api/chat` and reads `{ content }` back.
///
/// Any non-2xx status is a failure; the server's `details` field is kept when the
/// body parses.
pub struct HttpGateway {
    client: reqwest::Client,
    url: String,
}

impl HttpGateway {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), CHAT_ROUTE),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        let body = CompletionRequest {
            messages: messages.to_vec(),
        };
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let details = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.details)
                .unwrap_or(text);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                details,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(parsed.content)
    }
}
