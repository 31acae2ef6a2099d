//! HTTP server
//!
//! Serves the two proxy endpoints the browser client talks to:
//!
//! - `POST /api/df-session` — merge-upsert a partial session document
//! - `POST /api/openai-chat` — forward a prompt to the completion backend
//!
//! All shared dependencies live in one [`AppState`] built from the validated
//! configuration at startup; handlers never read ambient environment state.

pub mod handlers;

use crate::config::Config;
use crate::datafoundry::DataFoundryClient;
use crate::error::Result;
use crate::providers::CompletionBackend;

use axum::routing::post;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Validated configuration
    pub config: Arc<Config>,
    /// Data Foundry upsert client
    pub df_client: Arc<DataFoundryClient>,
    /// Completion backend
    pub backend: Arc<dyn CompletionBackend>,
}

impl AppState {
    /// Build the application state from configuration
    pub fn new(config: Config) -> Result<Self> {
        let df_client = DataFoundryClient::new(config.datafoundry.clone())?;
        let backend = crate::providers::create_backend(&config.openai)?;

        Ok(Self {
            config: Arc::new(config),
            df_client: Arc::new(df_client),
            backend: Arc::from(backend),
        })
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/df-session", post(handlers::upsert_session))
        .route("/api/openai-chat", post(handlers::chat_completion))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn serve(state: AppState) -> Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    )
    .parse()
    .map_err(|e| crate::error::TemporalError::Config(format!("Invalid listen address: {}", e)))?;

    let app = build_router(state);

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
