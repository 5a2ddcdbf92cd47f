// repositories/message_repository.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use tokio_postgres::{error::SqlState, Row};
use uuid::Uuid;

use crate::{error::StoreError, models::message::Message};

/// Storage behind the message service.
///
/// Implementations must enforce id uniqueness and must never leave a
/// partial record behind when `insert` fails.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persists a new record and returns it with its creation timestamp
    async fn insert(&self, id: Uuid, content: &str) -> Result<Message, StoreError>;

    /// Point lookup by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, StoreError>;

    /// Number of stored records
    async fn count(&self) -> Result<i64, StoreError>;

    /// Round trip to the backing storage
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Postgres-backed store; every call borrows one pooled connection
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: Pool,
}

impl PgMessageRepository {
    pub fn new(pool: Pool) -> Self {
        PgMessageRepository { pool }
    }
}

fn message_from_row(row: &Row) -> Message {
    Message {
        id: row.get(0),
        content: row.get(1),
        created_at: row.get::<_, DateTime<Utc>>(2),
    }
}

#[async_trait]
impl MessageStore for PgMessageRepository {
    async fn insert(&self, id: Uuid, content: &str) -> Result<Message, StoreError> {
        let query = "
            INSERT INTO messages (uuid, message)
            VALUES ($1, $2)
            RETURNING uuid, message, created_at
        ";

        // The connection goes back to the pool when `client` drops, on every path.
        let client = self.pool.get().await?;
        let statement = client.prepare_cached(query).await?;

        match client.query_one(&statement, &[&id, &content]).await {
            Ok(row) => Ok(message_from_row(&row)),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Err(StoreError::DuplicateId(id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, StoreError> {
        let query = "
            SELECT uuid, message, created_at
            FROM messages
            WHERE uuid = $1
        ";

        let client = self.pool.get().await?;
        let statement = client.prepare_cached(query).await?;
        let row = client.query_opt(&statement, &[&id]).await?;

        Ok(row.as_ref().map(message_from_row))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let client = self.pool.get().await?;
        let row = client.query_one("SELECT COUNT(*) FROM messages", &[]).await?;
        Ok(row.get(0))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        client.execute("SELECT 1", &[]).await?;
        Ok(())
    }
}
