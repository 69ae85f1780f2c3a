//! SQLite-backed record collection. Persistent per-user message history.

use std::path::Path;

use async_trait::async_trait;
use rusqlite::params;

use crate::conversation::{MessageStore, StoreError, StoredMessageRecord};
use crate::message::Role;

/// One table `chat_messages (id, user_id, message_id, role, content, timestamp)` keyed by
/// record id, indexed on `user_id`. Queries do not order rows.
pub struct SqliteMessageStore {
    db_path: std::path::PathBuf,
}

fn storage(e: impl std::fmt::Display) -> StoreError {
    StoreError::Storage(e.to_string())
}

impl SqliteMessageStore {
    /// Creates the store and ensures the table exists. `path` is the SQLite file path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = path.as_ref().to_path_buf();
        let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS chat_messages (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                message_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                timestamp INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_chat_messages_user_id ON chat_messages(user_id);
            "#,
        )
        .map_err(storage)?;
        Ok(Self { db_path })
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn insert(&self, record: &StoredMessageRecord) -> Result<(), StoreError> {
        let record = record.clone();
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
            conn.execute(
                "INSERT OR IGNORE INTO chat_messages (id, user_id, message_id, role, content, timestamp) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.id,
                    record.user_id,
                    record.message_id,
                    record.role.as_str(),
                    record.content,
                    record.timestamp
                ],
            )
            .map_err(storage)?;
            Ok::<(), StoreError>(())
        })
        .await
        .map_err(storage)?
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<StoredMessageRecord>, StoreError> {
        let owner = user_id.to_string();
        let user_id = owner.clone();
        let db_path = self.db_path.clone();
        let rows: Vec<(String, String, String, String, i64)> =
            tokio::task::spawn_blocking(move || {
                let conn = rusqlite::Connection::open(&db_path).map_err(storage)?;
                let mut stmt = conn
                    .prepare(
                        "SELECT id, message_id, role, content, timestamp FROM chat_messages WHERE user_id = ?1",
                    )
                    .map_err(storage)?;
                let rows = stmt
                    .query_map(params![user_id], |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
                    })
                    .map_err(storage)?;
                rows.collect::<Result<Vec<_>, _>>().map_err(storage)
            })
            .await
            .map_err(storage)??;

        rows.into_iter()
            .map(|(id, message_id, role, content, timestamp)| {
                let role = role
                    .parse::<Role>()
                    .map_err(|reason| StoreError::InvalidRecord {
                        id: id.clone(),
                        reason,
                    })?;
                Ok(StoredMessageRecord {
                    id,
                    user_id: owner.clone(),
                    message_id,
                    role,
                    content,
                    timestamp,
                })
            })
            .collect()
    }
}
