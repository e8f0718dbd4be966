use std::sync::Arc;

use biograph_db::DbPool;

use crate::config::ServerConfig;

/// State handed to every handler via `State<AppState>`.
///
/// Cloned per request; the pool is internally reference-counted and the
/// configuration sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        AppState {
            pool,
            config: Arc::new(config),
        }
    }
}
