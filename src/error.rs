// error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Failures coming out of a message store
#[derive(Error, Debug)]
pub enum StoreError {
    /// No connection could be taken from the pool
    #[error("Failed to get client from pool: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// The database rejected or failed the statement
    #[error("Query failed: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// An insert collided with an existing id
    #[error("Message id already exists: {0}")]
    DuplicateId(Uuid),
}

/// Request-level errors, each mapped to one HTTP status
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Message not found")]
    NotFound,

    #[error("Request body is too large")]
    PayloadTooLarge,

    /// The message is what the client sees; the source is only logged
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn storage(context: &'static str, source: StoreError) -> Self {
        AppError::Storage { context, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to hand back to the caller
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound => "Message not found".to_string(),
            AppError::PayloadTooLarge => "Request body is too large".to_string(),
            AppError::Storage { context, .. } => context.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "storage failure");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "client error");
        }

        let body = json!({
            "success": false,
            "error": self.user_message(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            AppError::validation("Message content is required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::PayloadTooLarge.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::storage("Failed to create message", StoreError::DuplicateId(Uuid::nil()))
                .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_detail_is_not_exposed() {
        let err = AppError::storage(
            "Failed to fetch message",
            StoreError::DuplicateId(Uuid::new_v4()),
        );

        assert_eq!(err.user_message(), "Failed to fetch message");
        assert!(err.to_string().contains("already exists"));
    }
}
