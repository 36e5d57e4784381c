use std::sync::Arc;

use tokio::net::TcpListener;
use triad_store::{InMemoryStore, Store};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// The triad HTTP server.
pub struct TriadServer {
    config: ServerConfig,
    store: Arc<dyn Store>,
}

impl TriadServer {
    /// A server over a fresh in-memory store sized by `config.listing`.
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(InMemoryStore::with_limits(config.listing.clone()));
        Self::with_store(config, store)
    }

    pub fn with_store(config: ServerConfig, store: Arc<dyn Store>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> ServerResult<axum::Router> {
        let state = AppState::from_config(&self.config, self.store.clone())?;
        Ok(build_router(state))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router()?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            tokens = self.config.sessions.tokens.len(),
            "triad server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
