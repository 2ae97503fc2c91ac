use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    AppState,
    config::{Config, DatabaseConfig},
    services::store::{MessageStore, StoreError},
};

pub const TEST_VERIFY_TOKEN: &str = "test-token";

pub fn test_config() -> Config {
    Config {
        app_host: "127.0.0.1".to_string(),
        app_port: 0,
        verify_token: TEST_VERIFY_TOKEN.to_string(),
        database: DatabaseConfig {
            host: "localhost".to_string(),
            name: "postgres".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            port: 5432,
            pool_mode: "transaction".to_string(),
        },
    }
}

pub fn test_state(store: Arc<dyn MessageStore>) -> AppState {
    AppState {
        cfg: test_config(),
        store,
    }
}

/// Keeps every saved (sender, text) pair in call order.
#[derive(Default)]
pub struct RecordingStore {
    rows: Mutex<Vec<(String, String)>>,
}

impl RecordingStore {
    pub fn saved(&self) -> Vec<(String, String)> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageStore for RecordingStore {
    async fn save_message(&self, sender_id: &str, message_text: &str) -> Result<(), StoreError> {
        self.rows
            .lock()
            .unwrap()
            .push((sender_id.to_string(), message_text.to_string()));
        Ok(())
    }
}

/// Behaves like an unreachable database.
pub struct FailingStore;

#[async_trait]
impl MessageStore for FailingStore {
    async fn save_message(&self, _sender_id: &str, _message_text: &str) -> Result<(), StoreError> {
        Err(StoreError::Connect(sqlx::Error::Io(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))))
    }
}

/// In-memory sink for `tracing` output, scoped to the current thread.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Routes events on this thread into the buffer until the guard drops.
    /// `#[tokio::test]` runs on a single thread, so handler logs land here too.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
