//! Conversation Store Adapter: append and load chat history per user.
//!
//! - **Backend** ([`MessageStore`]): an append-only record collection queried by
//!   equality on `user_id`. Returns records in no particular order.
//! - **Adapter** ([`ConversationStore`]): turns session [`Message`]s into
//!   [`StoredMessageRecord`]s on save, and sorts by ascending timestamp on load.
//!
//! There is no update or delete, and no limit on how many records a load returns.

mod in_memory_store;
mod sqlite_store;

pub use in_memory_store::InMemoryMessageStore;
pub use sqlite_store::SqliteMessageStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::message::{now_millis, Message, Role};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("storage: {0}")]
    Storage(String),
    #[error("invalid record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },
}

/// One persisted message. Records relate to each other only through `user_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredMessageRecord {
    /// Record key in the collection.
    pub id: String,
    pub user_id: String,
    /// Id of the session message this record was written from.
    pub message_id: String,
    pub role: Role,
    pub content: String,
    /// Milliseconds since Unix epoch.
    pub timestamp: i64,
}

impl StoredMessageRecord {
    pub fn into_message(self) -> Message {
        Message {
            role: self.role,
            content: self.content,
            id: self.message_id,
            timestamp: Some(self.timestamp),
        }
    }
}

/// Record collection backend.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Inserts one record. A record whose `id` already exists is left unchanged.
    async fn insert(&self, record: &StoredMessageRecord) -> Result<(), StoreError>;

    /// All records with this `user_id`, in no guaranteed order.
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<StoredMessageRecord>, StoreError>;
}

/// Write behaviour of [`ConversationStore`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// When true the record id is the message id, so saving the same message twice
    /// keeps one record. When false every save creates a new record.
    pub idempotent_writes: bool,
}

impl StoreOptions {
    /// Reads `PARLEY_IDEMPOTENT_WRITES` (`1`, `true`, `yes`); anything else is off.
    pub fn from_env() -> Self {
        Self {
            idempotent_writes: matches!(
                std::env::var("PARLEY_IDEMPOTENT_WRITES").as_deref(),
                Ok("1") | Ok("true") | Ok("yes")
            ),
        }
    }
}

/// Append/query adapter over a [`MessageStore`]. Cheap to clone.
#[derive(Clone)]
pub struct ConversationStore {
    backend: Arc<dyn MessageStore>,
    options: StoreOptions,
}

impl ConversationStore {
    pub fn new(backend: Arc<dyn MessageStore>) -> Self {
        Self::with_options(backend, StoreOptions::default())
    }

    pub fn with_options(backend: Arc<dyn MessageStore>, options: StoreOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Appends one record for `message`. Uses the message timestamp, or now when it has none.
    pub async fn save(&self, user_id: &str, message: &Message) -> Result<(), StoreError> {
        let id = if self.options.idempotent_writes {
            message.id.clone()
        } else {
            uuid::Uuid::new_v4().to_string()
        };
        let record = StoredMessageRecord {
            id,
            user_id: user_id.to_string(),
            message_id: message.id.clone(),
            role: message.role,
            content: message.content.clone(),
            timestamp: message.timestamp.unwrap_or_else(now_millis),
        };
        self.backend.insert(&record).await
    }

    /// All messages of `user_id`, ascending by timestamp. Ties keep backend order.
    pub async fn load_history(&self, user_id: &str) -> Result<Vec<Message>, StoreError> {
        let mut records = self.backend.find_by_user(user_id).await?;
        records.sort_by_key(|r| r.timestamp);
        Ok(records.into_iter().map(StoredMessageRecord::into_message).collect())
    }
}
