pub mod health;
pub mod plugin;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /plugin                                          player plugin endpoints (showtoken header)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/plugin", plugin::router())
}
