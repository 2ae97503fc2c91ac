use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

const INSERT_MESSAGE: &str = "INSERT INTO messages (sender_id, message_text) VALUES ($1, $2)";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connect failed: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("begin transaction failed: {0}")]
    Begin(#[source] sqlx::Error),
    #[error("insert failed: {0}")]
    Insert(#[source] sqlx::Error),
    #[error("commit failed: {0}")]
    Commit(#[source] sqlx::Error),
}

/// Destination for extracted messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn save_message(&self, sender_id: &str, message_text: &str) -> Result<(), StoreError>;
}

/// Opens a fresh connection per message; nothing is pooled between calls.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    options: PgConnectOptions,
}

impl PostgresStore {
    pub fn new(cfg: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&cfg.host)
            .port(cfg.port)
            .database(&cfg.name)
            .username(&cfg.user)
            .password(&cfg.password)
            .options([("pool_mode", cfg.pool_mode.as_str())]);

        Self { options }
    }
}

#[async_trait]
impl MessageStore for PostgresStore {
    async fn save_message(&self, sender_id: &str, message_text: &str) -> Result<(), StoreError> {
        let mut conn = self.options.connect().await.map_err(StoreError::Connect)?;

        let result = insert_message(&mut conn, sender_id, message_text).await;

        // Closed on both paths; a failed close is only worth a log line.
        if let Err(err) = conn.close().await {
            warn!("Failed to close database connection: {}", err);
        }

        if result.is_ok() {
            info!("Saved message from {} to the database", sender_id);
        }
        result
    }
}

async fn insert_message(
    conn: &mut PgConnection,
    sender_id: &str,
    message_text: &str,
) -> Result<(), StoreError> {
    let mut tx = conn.begin().await.map_err(StoreError::Begin)?;

    sqlx::query(INSERT_MESSAGE)
        .bind(sender_id)
        .bind(message_text)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::Insert)?;

    tx.commit().await.map_err(StoreError::Commit)
}
