//! StudyTrack API Server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use api_server::{config::Config, create_app, create_state, init_tracing, seed};
use doc_store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!("Starting StudyTrack API Server");

    let addr: SocketAddr = config.server_addr().parse()?;

    let store = Arc::new(MemoryStore::new());

    seed::bootstrap_admin(store.as_ref(), &config).await?;

    let state = create_state(config, store);

    let app = create_app(state);

    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
