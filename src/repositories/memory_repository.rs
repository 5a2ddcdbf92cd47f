// repositories/memory_repository.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{error::StoreError, models::message::Message};

use super::message_repository::MessageStore;

/// Process-local store with the same contract as the postgres one
#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: RwLock<HashMap<Uuid, Message>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageRepository {
    async fn insert(&self, id: Uuid, content: &str) -> Result<Message, StoreError> {
        let mut messages = self.messages.write().await;
        if messages.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }

        let message = Message {
            id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        messages.insert(id, message.clone());
        Ok(message)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, StoreError> {
        Ok(self.messages.read().await.get(&id).cloned())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.messages.read().await.len() as i64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_id_leaves_original_untouched() {
        let store = InMemoryMessageRepository::new();
        let id = Uuid::new_v4();

        store.insert(id, "first").await.unwrap();
        let err = store.insert(id, "second").await.unwrap_err();

        assert!(matches!(err, StoreError::DuplicateId(dup) if dup == id));
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.find_by_id(id).await.unwrap().unwrap().content, "first");
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let store = InMemoryMessageRepository::new();
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.ping().await.is_ok());
    }
}
