use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the append-only view log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEvent {
    /// Raw id from the request path, recorded whether or not a message exists
    pub message_id: String,
    pub timestamp: DateTime<Utc>,
    pub ip: String,
    pub user_agent: String,
}

impl ViewEvent {
    pub fn now(message_id: impl Into<String>, ip: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            timestamp: Utc::now(),
            ip: ip.into(),
            user_agent: user_agent.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ViewResponse {
    pub success: bool,
}
