use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::message::{validate_not_blank, Message},
    repositories::message_repository::MessageStore,
};

/// Result of a successful create: the new id and the link to share
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedMessage {
    pub id: Uuid,
    pub url: String,
}

/// Create and fetch over a [`MessageStore`]
#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
    game_url: String,
}

impl MessageService {
    pub fn new(store: Arc<dyn MessageStore>, game_url: impl Into<String>) -> Self {
        Self {
            store,
            game_url: game_url.into(),
        }
    }

    /// Stores `content` verbatim under a fresh random id.
    ///
    /// Blank content is rejected before anything touches the store.
    pub async fn create(&self, content: &str) -> Result<CreatedMessage, AppError> {
        validate_not_blank(content)
            .map_err(|_| AppError::validation("Message content is required"))?;

        let id = Uuid::new_v4();
        let message = self
            .store
            .insert(id, content)
            .await
            .map_err(|e| AppError::storage("Failed to create message", e))?;

        info!(uuid = %message.id, "message created");

        Ok(CreatedMessage {
            id: message.id,
            url: self.share_url(&message.id),
        })
    }

    /// Looks up one message. An id that is not a UUID cannot exist, so it is
    /// reported as not found without a query.
    pub async fn fetch(&self, id: &str) -> Result<Message, AppError> {
        if id.is_empty() {
            return Err(AppError::validation("UUID is required"));
        }

        let Ok(uuid) = Uuid::parse_str(id) else {
            debug!(id, "malformed id");
            return Err(AppError::NotFound);
        };

        let found = self
            .store
            .find_by_id(uuid)
            .await
            .map_err(|e| AppError::storage("Failed to fetch message", e))?;

        debug!(%uuid, found = found.is_some(), "message lookup");
        found.ok_or(AppError::NotFound)
    }

    /// Link handed to the sender; the game reads the id back from the query string
    pub fn share_url(&self, id: &Uuid) -> String {
        format!("{}?id={}", self.game_url, id)
    }
}
