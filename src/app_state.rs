// app_state.rs

use std::sync::Arc;

use crate::{
    repositories::message_repository::MessageStore,
    services::{message_service::MessageService, view_log::ViewRecorder},
};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Create/fetch over the message store
    pub messages: MessageService,
    /// Best-effort sink for view events
    pub views: Arc<dyn ViewRecorder>,
}

impl AppState {
    /// Creates a new instance of AppState
    ///
    /// # Arguments
    /// * `store` - Storage backing the message table
    /// * `views` - Where view events are appended
    /// * `game_url` - Base URL that share links point at
    pub fn new(store: Arc<dyn MessageStore>, views: Arc<dyn ViewRecorder>, game_url: impl Into<String>) -> Self {
        Self {
            messages: MessageService::new(store, game_url),
            views,
        }
    }
}
