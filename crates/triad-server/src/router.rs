use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use triad_gate::{DefaultValidator, Pipeline};
use triad_store::Store;

use crate::auth::{SessionProvider, StaticTokenSessions};
use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler;

/// Shared state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub sessions: Arc<dyn SessionProvider>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, sessions: Arc<dyn SessionProvider>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            sessions,
        }
    }

    /// The standard pipeline over `store`, with the path table and token
    /// sessions taken from `config`.
    pub fn from_config(config: &ServerConfig, store: Arc<dyn Store>) -> ServerResult<Self> {
        let rules = Arc::new(config.access.rules()?);
        let pipeline = Pipeline::standard(store, rules, Arc::new(DefaultValidator));
        let sessions = Arc::new(StaticTokenSessions::new(config.sessions.tokens.clone()));
        Ok(Self::new(pipeline, sessions))
    }
}

/// Build the axum router: the health check, with everything else falling
/// through to the pipeline.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/_health", get(handler::health_handler))
        .fallback(handler::dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
