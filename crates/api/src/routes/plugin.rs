//! Route definitions for the player plugin.
//!
//! All routes require the `showtoken` header.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::plugin;
use crate::state::AppState;

/// Routes mounted at `/plugin`.
///
/// ```text
/// GET    /next-playlist-in-queue          -> next_playlist_in_queue
/// POST   /update-playlist-queue           -> update_playlist_queue
/// POST   /sync-playlists                  -> sync_playlists
/// POST   /update-whats-playing            -> update_whats_playing
/// POST   /update-next-scheduled-sequence  -> update_next_scheduled_sequence
/// GET    /viewer-control-mode             -> viewer_control_mode
/// GET    /highest-voted-playlist          -> highest_voted_playlist
/// POST   /plugin-version                  -> plugin_version
/// GET    /remote-preferences              -> remote_preferences
/// DELETE /purge-queue                     -> purge_queue
/// DELETE /reset-all-votes                 -> reset_all_votes
/// POST   /toggle-viewer-control           -> toggle_viewer_control
/// POST   /update-viewer-control           -> update_viewer_control
/// POST   /update-managed-psa              -> update_managed_psa
/// POST   /fpp-heartbeat                   -> fpp_heartbeat
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/next-playlist-in-queue", get(plugin::next_playlist_in_queue))
        .route("/update-playlist-queue", post(plugin::update_playlist_queue))
        .route("/sync-playlists", post(plugin::sync_playlists))
        .route("/update-whats-playing", post(plugin::update_whats_playing))
        .route(
            "/update-next-scheduled-sequence",
            post(plugin::update_next_scheduled_sequence),
        )
        .route("/viewer-control-mode", get(plugin::viewer_control_mode))
        .route("/highest-voted-playlist", get(plugin::highest_voted_playlist))
        .route("/plugin-version", post(plugin::plugin_version))
        .route("/remote-preferences", get(plugin::remote_preferences))
        .route("/purge-queue", delete(plugin::purge_queue))
        .route("/reset-all-votes", delete(plugin::reset_all_votes))
        .route("/toggle-viewer-control", post(plugin::toggle_viewer_control))
        .route("/update-viewer-control", post(plugin::update_viewer_control))
        .route("/update-managed-psa", post(plugin::update_managed_psa))
        .route("/fpp-heartbeat", post(plugin::fpp_heartbeat))
}
