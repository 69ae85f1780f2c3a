//! Message types for a chat session.
//!
//! Roles: User, Assistant. A [`Message`] carries a list-stable id and an optional
//! epoch-millisecond timestamp; [`ChatMessage`] is the role+content projection sent
//! over the wire and to the completion API.

use serde::{Deserialize, Serialize};

/// Id of the seeded greeting message.
pub const GREETING_ID: &str = "welcome";

/// Greeting shown when a session starts without history.
pub const GREETING_TEXT: &str = "你好！我是AI助手，很高兴为您服务。请问有什么我可以帮您的吗？";

/// Assistant text appended when the completion call fails.
pub const FALLBACK_TEXT: &str = "抱歉，发生了一些错误。请稍后再试。";

/// Author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(format!("unknown role: {} (use user or assistant)", s)),
        }
    }
}

/// Role + content pair: what the gateway receives and forwards upstream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A single message in the session.
///
/// `id` only keeps rendered lists stable; two messages are never merged even when
/// role and content match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub id: String,
    /// Milliseconds since Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Message {
    /// User message with a fresh `user-<uuid>` id and the current timestamp.
    pub fn user(content: impl Into<String>) -> Self {
        Self::stamped(Role::User, "user", content)
    }

    /// Assistant message with a fresh `assistant-<uuid>` id and the current timestamp.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::stamped(Role::Assistant, "assistant", content)
    }

    /// The fixed fallback assistant message (`error-<uuid>` id).
    pub fn fallback() -> Self {
        Self::stamped(Role::Assistant, "error", FALLBACK_TEXT)
    }

    /// The seeded greeting. No timestamp: it is display-only.
    pub fn greeting() -> Self {
        Self {
            role: Role::Assistant,
            content: GREETING_TEXT.to_string(),
            id: GREETING_ID.to_string(),
            timestamp: None,
        }
    }

    pub fn is_greeting(&self) -> bool {
        self.id == GREETING_ID
    }

    /// Strips id and timestamp.
    pub fn to_chat(&self) -> ChatMessage {
        ChatMessage {
            role: self.role,
            content: self.content.clone(),
        }
    }

    fn stamped(role: Role, kind: &str, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            id: format!("{}-{}", kind, uuid::Uuid::new_v4()),
            timestamp: Some(now_millis()),
        }
    }
}

/// Current time in milliseconds since Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn unknown_role_fails_to_deserialize() {
        let r: Result<ChatMessage, _> =
            serde_json::from_str(r#"{"role":"system","content":"x"}"#);
        assert!(r.is_err());
        assert!("system".parse::<Role>().is_err());
        assert_eq!("assistant".parse::<Role>().unwrap(), Role::Assistant);
    }

    #[test]
    fn constructors_assign_prefixed_unique_ids() {
        let a = Message::user("hi");
        let b = Message::user("hi");
        assert!(a.id.starts_with("user-"));
        assert_ne!(a.id, b.id);
        assert!(a.timestamp.is_some());
        assert!(Message::assistant("x").id.starts_with("assistant-"));
        let fb = Message::fallback();
        assert!(fb.id.starts_with("error-"));
        assert_eq!(fb.content, FALLBACK_TEXT);
        assert_eq!(fb.role, Role::Assistant);
    }

    #[test]
    fn greeting_is_display_only() {
        let g = Message::greeting();
        assert!(g.is_greeting());
        assert_eq!(g.role, Role::Assistant);
        assert!(g.timestamp.is_none());
        assert!(!Message::assistant(GREETING_TEXT).is_greeting());
    }

    #[test]
    fn to_chat_strips_id_and_timestamp() {
        let m = Message::user("Hello");
        let json = serde_json::to_string(&m.to_chat()).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"Hello"}"#);
    }
}
