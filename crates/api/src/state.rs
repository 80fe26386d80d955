use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (the pool is an `Arc` internally, the config is
/// behind one).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: muster_db::DbPool,
    /// Server configuration (JWT settings, results identity policy).
    pub config: Arc<ServerConfig>,
}
