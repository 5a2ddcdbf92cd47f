use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A stored message. Immutable once persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "uuid")]
    pub id: Uuid,
    #[serde(rename = "message")]
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[serde(default)]
    #[validate(required, custom = "validate_not_blank")]
    pub message: Option<String>,
}

/// Body returned by `POST /api/messages`
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMessageResponse {
    pub success: bool,
    pub uuid: Uuid,
    pub url: String,
}

/// Body returned by `GET /api/messages/:uuid`
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub success: bool,
    pub data: Message,
}

/// Content must keep at least one character once surrounding whitespace is gone
pub fn validate_not_blank(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("Message content is required"));
        return Err(error);
    }
    Ok(())
}
