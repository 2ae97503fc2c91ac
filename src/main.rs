mod apidoc;
mod config;
mod handlers;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use config::Config;
use services::store::{MessageStore, PostgresStore};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub store: Arc<dyn MessageStore>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::from_env().expect("Failed to load configuration");
    let addr = format!("{}:{}", cfg.app_host, cfg.app_port);

    // No connection is opened here; the handshake works without a database.
    let store: Arc<dyn MessageStore> = Arc::new(PostgresStore::new(&cfg.database));

    let state = AppState { cfg, store };
    let app = routes::router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("Webhook receiver listening on http://{addr}");
    axum::serve(listener, app).await.expect("Server error");
}
