use std::sync::Arc;

use netwood_ingest::pipeline::Ingestor;
use sqlx::SqlitePool;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub ingestor: Arc<Ingestor>,
}
