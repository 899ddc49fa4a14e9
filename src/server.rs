//! HTTP listener lifecycle.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::api::{router, AppState};
use crate::config::ServerConfig;
use crate::datastore::UserStore;

/// Build the shared state for a config: a fresh store seeded with `seed_users`
pub fn build_state(config: &ServerConfig) -> AppState {
    let store = Arc::new(UserStore::with_users(config.seed_users.iter().cloned()));
    AppState::new(store, config.redirect_url.clone())
}

/// Bind the listener and serve until Ctrl-C
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let state = build_state(&config);
    info!("seeded store with {} users", state.store.len());

    let app = router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("server started at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Ctrl-C received, shutting down");
    }
}
