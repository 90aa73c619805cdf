use std::sync::Arc;

use crate::llm_client::LlmClient;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL-backed when DATABASE_URL is set, in-memory otherwise.
    pub store: Arc<dyn DocumentStore>,
    pub llm: LlmClient,
}
