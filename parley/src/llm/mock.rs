//! Mock completion client for tests and offline demos.
//!
//! Returns a fixed reply (or a fixed failure) and records every message list it
//! receives so callers can assert on what would have gone upstream.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm::{CompletionClient, CompletionError};
use crate::message::ChatMessage;

enum Behaviour {
    Reply(String),
    Fail(String),
}

pub struct MockCompletion {
    behaviour: Behaviour,
    delay: Option<Duration>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockCompletion {
    /// Always answers with `content`.
    pub fn replying(content: impl Into<String>) -> Self {
        Self {
            behaviour: Behaviour::Reply(content.into()),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always fails with an upstream error carrying `detail`.
    pub fn failing(detail: impl Into<String>) -> Self {
        Self {
            behaviour: Behaviour::Fail(detail.into()),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Waits `delay` before answering, like a slow upstream.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Message lists received so far, in call order.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.behaviour {
            Behaviour::Reply(c) => Ok(c.clone()),
            Behaviour::Fail(d) => Err(CompletionError::Upstream(d.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replying_records_calls() {
        let mock = MockCompletion::replying("ok");
        assert_eq!(mock.complete(&[ChatMessage::user("a")]).await.unwrap(), "ok");
        assert_eq!(mock.complete(&[ChatMessage::user("b")]).await.unwrap(), "ok");
        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1][0].content, "b");
    }

    #[tokio::test]
    async fn failing_returns_upstream_error() {
        let mock = MockCompletion::failing("down");
        let err = mock.complete(&[ChatMessage::user("a")]).await.unwrap_err();
        assert!(matches!(err, CompletionError::Upstream(ref d) if d == "down"));
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn delay_is_applied() {
        let mock = MockCompletion::replying("late").with_delay(Duration::from_millis(20));
        let started = std::time::Instant::now();
        assert_eq!(mock.complete(&[ChatMessage::user("a")]).await.unwrap(), "late");
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
