//! Connection helpers.

use tokio_postgres::{Client, NoTls};

use crate::{Error, Result};

/// Connect to Postgres and spawn the connection driver task.
pub async fn connect(url: &str) -> Result<Client> {
    let (client, connection) = tokio_postgres::connect(url, NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::warn!("postgres connection error: {e}");
        }
    });

    Ok(client)
}

/// Connect using `DATABASE_URL`, loading `.env` if present.
pub async fn connect_env() -> Result<Client> {
    let _ = dotenvy::dotenv();
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| Error::Config("DATABASE_URL is not set".to_string()))?;
    connect(&url).await
}
