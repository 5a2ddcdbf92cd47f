use log::info;
use tokio_postgres::Client;

/// Creates the messages table if it is not there yet. Safe to run on every boot.
pub async fn apply_migrations(client: &Client) -> Result<(), tokio_postgres::Error> {
    let create_messages_table_query = "
        CREATE TABLE IF NOT EXISTS messages (
            uuid UUID PRIMARY KEY,
            message TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    ";
    client.execute(create_messages_table_query, &[]).await?;

    info!("Table 'messages' is ready");
    Ok(())
}
