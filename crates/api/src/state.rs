use std::sync::Arc;

use cura_pipeline::SearchPipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cura_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The search pipeline (database + attribute extractor).
    pub pipeline: Arc<SearchPipeline>,
}
