mod auth;
mod config;
mod db;
mod errors;
mod extract;
mod interviews;
mod llm_client;
mod routes;
mod state;
mod store;
mod users;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Fails on missing GEMINI_API_KEY
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MockPrep API v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;

    let llm = LlmClient::new(
        config.gemini_api_key.clone(),
        Duration::from_secs(config.generation_timeout_secs),
    )?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState { store, llm };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// PostgreSQL when DATABASE_URL is set, otherwise an in-process store that is lost on exit.
async fn build_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Ok(Arc::new(PgDocumentStore::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set; interviews are kept in memory only");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
    }
}
