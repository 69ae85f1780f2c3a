//! # Parley
//!
//! A minimal chat system core: collect user messages, forward them through a completion
//! gateway to a hosted OpenAI-compatible (Azure OpenAI) chat-completion API, render the
//! reply, and keep per-user conversation history in an append-only message store.
//!
//! ## Main modules
//!
//! - [`message`]: [`Message`], [`ChatMessage`], [`Role`]; the greeting and fallback texts.
//! - [`protocol`]: JSON bodies of the `/api/chat` route ([`CompletionRequest`],
//!   [`CompletionResponse`], [`ErrorResponse`]).
//! - [`llm`]: [`CompletionClient`] trait, [`AzureChatClient`], [`MockCompletion`],
//!   [`AzureSettings`].
//! - [`gateway`]: [`Gateway`] trait; [`CompletionGateway`] (in-process) and
//!   [`HttpGateway`] (over the `/api/chat` route).
//! - [`conversation`]: [`ConversationStore`] adapter over a [`MessageStore`] backend
//!   ([`SqliteMessageStore`], [`InMemoryMessageStore`]).
//! - [`session`]: [`ChatSession`], the per-view controller with its Busy/Idle gate.
//! - [`user`]: [`UserProfile`] supplied by the identity provider.

pub mod conversation;
pub mod gateway;
pub mod llm;
pub mod message;
pub mod protocol;
pub mod session;
pub mod user;

#[cfg(test)]
mod test_http;

pub use conversation::{
    ConversationStore, InMemoryMessageStore, MessageStore, SqliteMessageStore, StoreError,
    StoreOptions, StoredMessageRecord,
};
pub use gateway::{CompletionGateway, Gateway, GatewayError, HttpGateway};
pub use llm::{
    AzureChatClient, AzureSettings, CompletionClient, CompletionError, MockCompletion,
    SettingsError,
};
pub use message::{ChatMessage, Message, Role, FALLBACK_TEXT, GREETING_ID, GREETING_TEXT};
pub use protocol::{CompletionRequest, CompletionResponse, ErrorResponse};
pub use session::{
    ChatSession, Gate, IgnoreReason, PendingTurn, PersistFailure, PersistQueue, SessionPhase,
    SubmitOutcome,
};
pub use user::UserProfile;
