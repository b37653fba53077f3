use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AppConfig;

/// Shared application state, constructed once at startup and injected into
/// handlers and middleware
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}
