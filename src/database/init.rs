// init.rs

use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use log::info;
use thiserror::Error;
use tokio_postgres::NoTls;

use crate::config::AppConfig;
use crate::database::migrations::apply_migrations;

/// Database-related error types
#[derive(Error, Debug)]
pub enum DbError {
    /// Error when connection pool creation fails
    #[error("Failed to create pool: {0}")]
    PoolCreationError(String),

    /// Error when no connection can be established at startup
    #[error("Failed to connect to database: {0}")]
    ConnectionError(String),

    /// Error when database migration fails
    #[error("Migration error: {0}")]
    MigrationError(String),
}

/// Creates a bounded connection pool from the storage settings
///
/// Callers wait for a free connection when all `pool_max_size` are in use;
/// the wait itself has no timeout.
fn create_pool(config: &AppConfig) -> Result<Pool, DbError> {
    let storage = &config.storage;

    let mut cfg = Config::new();
    cfg.host = Some(storage.host.clone());
    cfg.port = Some(storage.port);
    cfg.user = Some(storage.user.clone());
    cfg.password = storage.password.clone();
    cfg.dbname = Some(storage.dbname.clone());

    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig::new(config.pool_max_size));

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| DbError::PoolCreationError(e.to_string()))
}

/// Initializes the pool, proves connectivity and applies migrations
pub async fn init_db(config: &AppConfig) -> Result<Pool, DbError> {
    let pool = create_pool(config)?;

    let client = pool
        .get()
        .await
        .map_err(|e| DbError::ConnectionError(e.to_string()))?;

    apply_migrations(&client)
        .await
        .map_err(|e| DbError::MigrationError(e.to_string()))?;

    info!(
        "Database pool ready ({}@{}:{}/{}, max {} connections)",
        config.storage.user,
        config.storage.host,
        config.storage.port,
        config.storage.dbname,
        config.pool_max_size
    );
    Ok(pool)
}
