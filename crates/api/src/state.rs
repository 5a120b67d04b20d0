use std::sync::Arc;

use showplay_core::clock::Clock;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: showplay_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Time source for vote tie-breaks, PSA rotation and heartbeats.
    pub clock: Arc<dyn Clock>,
}
