//! Chat Session Controller.
//!
//! Owns the ordered message list of one chat view and drives two small state machines:
//!
//! - **Phase**: `Uninitialized → Seeded | Loaded`, taken once by [`ChatSession::mount`].
//!   A session with a user and a store whose history is non-empty becomes `Loaded` with
//!   exactly that history; every other case becomes `Seeded` with the greeting.
//! - **Gate**: `Idle ⇄ Busy`. [`ChatSession::begin_submit`] takes `Idle → Busy` and
//!   appends the user message; [`ChatSession::finish_turn`] takes `Busy → Idle` and
//!   appends the reply or the fallback. Submissions while `Busy` are ignored.
//!
//! Store writes go through [`PersistQueue`]: they never block the gate and never roll
//! back an in-memory append.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use parley::{ChatSession, CompletionGateway, MockCompletion};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let gateway = CompletionGateway::new(Arc::new(MockCompletion::replying("Hi there")));
//! let mut session = ChatSession::new(Arc::new(gateway));
//! session.mount().await;
//! session.set_input("Hello");
//! session.submit().await;
//! assert_eq!(session.messages().len(), 3);
//! # }
//! ```

mod persist;

pub use persist::{PersistFailure, PersistQueue};

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::conversation::ConversationStore;
use crate::gateway::{Gateway, GatewayError};
use crate::message::{now_millis, ChatMessage, Message};
use crate::user::UserProfile;

/// Initialisation phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Not mounted yet; submissions are ignored.
    Uninitialized,
    /// Started with the greeting only.
    Seeded,
    /// Started with history loaded from the store.
    Loaded,
}

/// Busy/Idle gate: at most one completion in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    Idle,
    Busy,
}

/// Why a submission did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    NotMounted,
    Busy,
    EmptyInput,
}

/// A turn that has started: the user message is appended and the gate is `Busy`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTurn {
    pub user_message_id: String,
    /// Role+content projection of the session to send to the gateway.
    pub request: Vec<ChatMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started(PendingTurn),
    Ignored(IgnoreReason),
}

/// One active chat view.
pub struct ChatSession {
    gateway: Arc<dyn Gateway>,
    store: Option<ConversationStore>,
    user: Option<UserProfile>,
    messages: Vec<Message>,
    input: String,
    phase: SessionPhase,
    gate: Gate,
    persist: PersistQueue,
}

impl ChatSession {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            store: None,
            user: None,
            messages: Vec::new(),
            input: String::new(),
            phase: SessionPhase::Uninitialized,
            gate: Gate::Idle,
            persist: PersistQueue::new(),
        }
    }

    /// Saves run as tokio tasks; appends made outside a runtime are reported by
    /// [`ChatSession::flush_persistence`] instead of being saved.
    pub fn with_store(mut self, store: ConversationStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = Some(user);
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn gate(&self) -> Gate {
        self.gate
    }

    pub fn is_busy(&self) -> bool {
        self.gate == Gate::Busy
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// The injected gateway, for callers that drive [`begin_submit`](Self::begin_submit)
    /// and [`finish_turn`](Self::finish_turn) themselves.
    pub fn gateway(&self) -> Arc<dyn Gateway> {
        Arc::clone(&self.gateway)
    }

    /// Replaces the input field.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Runs the one initialisation transition. No-op once initialised.
    pub async fn mount(&mut self) -> SessionPhase {
        if self.phase != SessionPhase::Uninitialized {
            return self.phase;
        }
        let history = match (&self.user, &self.store) {
            (Some(user), Some(store)) => match store.load_history(&user.uid).await {
                Ok(history) => history,
                Err(e) => {
                    warn!(user_id = %user.uid, "history load failed, starting fresh: {}", e);
                    Vec::new()
                }
            },
            _ => Vec::new(),
        };
        if history.is_empty() {
            self.messages = vec![Message::greeting()];
            self.phase = SessionPhase::Seeded;
        } else {
            info!(count = history.len(), "loaded conversation history");
            self.messages = history;
            self.phase = SessionPhase::Loaded;
        }
        self.phase
    }

    /// `Idle → Busy`: appends the user message from the input field, clears the
    /// field, queues its save and returns the request to send. Called outside a tokio
    /// runtime the save is recorded as a failure rather than spawned.
    pub fn begin_submit(&mut self) -> SubmitOutcome {
        if self.phase == SessionPhase::Uninitialized {
            return SubmitOutcome::Ignored(IgnoreReason::NotMounted);
        }
        if self.gate == Gate::Busy {
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        }
        if self.input.trim().is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
        }

        let message = Message::user(std::mem::take(&mut self.input));
        let user_message_id = message.id.clone();
        self.append(message);
        self.gate = Gate::Busy;
        debug!(message_id = %user_message_id, "turn started");

        SubmitOutcome::Started(PendingTurn {
            user_message_id,
            request: self.request_messages(),
        })
    }

    /// `Busy → Idle`: appends the reply, or the fallback when the gateway failed.
    /// Returns the appended message; `None` when no turn was in flight.
    pub fn finish_turn(&mut self, result: Result<String, GatewayError>) -> Option<&Message> {
        if self.gate != Gate::Busy {
            return None;
        }
        let message = match result {
            Ok(content) => Message::assistant(content),
            Err(e) => {
                warn!("completion failed, showing fallback: {}", e);
                Message::fallback()
            }
        };
        self.append(message);
        self.gate = Gate::Idle;
        self.messages.last()
    }

    /// Full turn: [`begin_submit`](Self::begin_submit), gateway call,
    /// [`finish_turn`](Self::finish_turn).
    pub async fn submit(&mut self) -> SubmitOutcome {
        let outcome = self.begin_submit();
        if let SubmitOutcome::Started(turn) = &outcome {
            let gateway = Arc::clone(&self.gateway);
            let result = gateway.complete(&turn.request).await;
            self.finish_turn(result);
        }
        outcome
    }

    /// Sets the input field to `text` and submits it.
    pub async fn send(&mut self, text: impl Into<String>) -> SubmitOutcome {
        self.set_input(text);
        self.submit().await
    }

    /// Awaits queued store writes; returns the failures captured since the last call.
    pub async fn flush_persistence(&mut self) -> Vec<PersistFailure> {
        self.persist.flush().await
    }

    /// The session as sent upstream: ids and timestamps stripped, greeting left out.
    fn request_messages(&self) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .filter(|m| !m.is_greeting())
            .map(Message::to_chat)
            .collect()
    }

    /// Pushes `message`, stamped strictly after the last timestamped message so a
    /// reload sorted by timestamp keeps session order.
    fn append(&mut self, mut message: Message) {
        let stamp = message.timestamp.unwrap_or_else(now_millis);
        message.timestamp = Some(match self.messages.iter().rev().find_map(|m| m.timestamp) {
            Some(last) => stamp.max(last + 1),
            None => stamp,
        });
        if let (Some(store), Some(user)) = (&self.store, &self.user) {
            self.persist
                .enqueue(store.clone(), user.uid.clone(), message.clone());
        }
        self.messages.push(message);
    }
}
