//! In-memory record collection for tests and sessions without a history database.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::conversation::{MessageStore, StoreError, StoredMessageRecord};

/// Records keyed by id. `find_by_user` returns them in hash order.
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    records: RwLock<HashMap<String, StoredMessageRecord>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all users.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, record: &StoredMessageRecord) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Storage("lock".into()))?;
        records
            .entry(record.id.clone())
            .or_insert_with(|| record.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<StoredMessageRecord>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Storage("lock".into()))?;
        Ok(records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    fn record(id: &str, user_id: &str) -> StoredMessageRecord {
        StoredMessageRecord {
            id: id.to_string(),
            user_id: user_id.to_string(),
            message_id: id.to_string(),
            role: Role::Assistant,
            content: format!("content {}", id),
            timestamp: 1,
        }
    }

    #[tokio::test]
    async fn insert_keeps_first_record_per_id() {
        let store = InMemoryMessageStore::new();
        store.insert(&record("a", "u")).await.unwrap();
        let mut again = record("a", "u");
        again.content = "changed".into();
        store.insert(&again).await.unwrap();
        assert_eq!(store.len(), 1);
        let found = store.find_by_user("u").await.unwrap();
        assert_eq!(found[0].content, "content a");
    }

    #[tokio::test]
    async fn find_by_user_filters() {
        let store = InMemoryMessageStore::new();
        store.insert(&record("a", "u1")).await.unwrap();
        store.insert(&record("b", "u2")).await.unwrap();
        store.insert(&record("c", "u1")).await.unwrap();
        assert_eq!(store.find_by_user("u1").await.unwrap().len(), 2);
        assert_eq!(store.find_by_user("u2").await.unwrap().len(), 1);
        assert!(store.find_by_user("u3").await.unwrap().is_empty());
    }
}
