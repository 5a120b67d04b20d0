//! Handlers for the player plugin endpoints.
//!
//! Every endpoint is scoped to one show via the `showtoken` header. Reads go
//! through [`read_show`]; writes go through [`mutate_show`], which persists the
//! aggregate with an optimistic version check.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use showplay_core::catalog::PlaylistEntry;
use showplay_core::playback;

use crate::error::AppResult;
use crate::middleware::show_token::ShowToken;
use crate::response::{DataResponse, MessageResponse};
use crate::session::{mutate_show, read_show};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Request body for POST /plugin/sync-playlists.
#[derive(Debug, Deserialize)]
pub struct SyncPlaylistsRequest {
    #[serde(default)]
    pub playlists: Vec<PlaylistEntry>,
}

/// Request body for POST /plugin/update-whats-playing.
#[derive(Debug, Deserialize)]
pub struct UpdateWhatsPlayingRequest {
    #[serde(default)]
    pub playlist: String,
}

/// Request body for POST /plugin/update-next-scheduled-sequence.
#[derive(Debug, Deserialize)]
pub struct UpdateNextScheduledRequest {
    #[serde(default)]
    pub sequence: String,
}

/// Request body for POST /plugin/plugin-version.
#[derive(Debug, Deserialize)]
pub struct PluginVersionRequest {
    pub plugin_version: Option<String>,
    pub fpp_version: Option<String>,
}

/// Request body for POST /plugin/update-viewer-control.
#[derive(Debug, Deserialize)]
pub struct ViewerControlRequest {
    #[serde(default)]
    pub viewer_control_enabled: String,
}

/// Request body for POST /plugin/update-managed-psa.
#[derive(Debug, Deserialize)]
pub struct ManagedPsaRequest {
    #[serde(default)]
    pub managed_psa_enabled: String,
}

#[derive(Debug, Serialize)]
pub struct CurrentPlaylistResponse {
    pub current_playlist: String,
}

#[derive(Debug, Serialize)]
pub struct NextScheduledResponse {
    pub next_scheduled_sequence: String,
}

#[derive(Debug, Serialize)]
pub struct ViewerControlModeResponse {
    pub viewer_control_mode: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ViewerControlResponse {
    pub viewer_control_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ManagedPsaResponse {
    pub managed_psa_enabled: bool,
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

/// GET /api/v1/plugin/next-playlist-in-queue
///
/// Pops the next jukebox request. Returns `null` / `-1` when the queue is empty.
pub async fn next_playlist_in_queue(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let next = mutate_show(&state, &token, |show, _| playback::next_in_queue(show)).await?;

    if let Some(name) = &next.next_playlist {
        tracing::info!(show_token = %token, sequence = %name, "Dequeued request");
    }

    Ok(Json(DataResponse { data: next }))
}

/// POST /api/v1/plugin/update-playlist-queue
pub async fn update_playlist_queue(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let message = read_show(&state, &token, |show| Ok(playback::queue_status(show))).await?;
    Ok(Json(DataResponse {
        data: MessageResponse { message },
    }))
}

/// DELETE /api/v1/plugin/purge-queue
///
/// Drops all pending requests and votes.
pub async fn purge_queue(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    mutate_show(&state, &token, |show, _| {
        playback::purge_queue(show);
        Ok(())
    })
    .await?;

    tracing::info!(show_token = %token, "Queue purged");
    Ok(Json(DataResponse {
        data: MessageResponse::success(),
    }))
}

// ---------------------------------------------------------------------------
// Catalog and playback
// ---------------------------------------------------------------------------

/// POST /api/v1/plugin/sync-playlists
///
/// Reconciles the catalog with the player's playlist list. Rejected as a
/// whole when it would exceed the configured sequence limit.
pub async fn sync_playlists(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
    Json(input): Json<SyncPlaylistsRequest>,
) -> AppResult<impl IntoResponse> {
    let limit = state.config.sequence_limit;

    mutate_show(&state, &token, |show, _| {
        playback::sync_playlists(show, &input.playlists, limit)
    })
    .await
    .inspect_err(|e| tracing::warn!(show_token = %token, error = %e, "Playlist sync rejected"))?;

    tracing::info!(
        show_token = %token,
        playlists = input.playlists.len(),
        "Playlists synced",
    );
    Ok(Json(DataResponse {
        data: MessageResponse::success(),
    }))
}

/// POST /api/v1/plugin/update-whats-playing
///
/// Records a now-playing transition. An empty playlist clears playback state.
pub async fn update_whats_playing(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
    Json(input): Json<UpdateWhatsPlayingRequest>,
) -> AppResult<impl IntoResponse> {
    mutate_show(&state, &token, |show, clock| {
        playback::update_whats_playing(show, &input.playlist, clock)
    })
    .await?;

    tracing::debug!(show_token = %token, playlist = %input.playlist, "Now playing updated");
    Ok(Json(DataResponse {
        data: CurrentPlaylistResponse {
            current_playlist: input.playlist,
        },
    }))
}

/// POST /api/v1/plugin/update-next-scheduled-sequence
pub async fn update_next_scheduled_sequence(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
    Json(input): Json<UpdateNextScheduledRequest>,
) -> AppResult<impl IntoResponse> {
    mutate_show(&state, &token, |show, _| {
        playback::update_next_scheduled(show, &input.sequence)
    })
    .await?;

    Ok(Json(DataResponse {
        data: NextScheduledResponse {
            next_scheduled_sequence: input.sequence,
        },
    }))
}

// ---------------------------------------------------------------------------
// Voting
// ---------------------------------------------------------------------------

/// GET /api/v1/plugin/highest-voted-playlist
///
/// Resolves and consumes the current vote winner.
pub async fn highest_voted_playlist(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let winner = mutate_show(&state, &token, playback::highest_voted).await?;

    if let Some(name) = &winner.winning_playlist {
        tracing::info!(show_token = %token, sequence = %name, "Vote winner selected");
    }

    Ok(Json(DataResponse { data: winner }))
}

/// DELETE /api/v1/plugin/reset-all-votes
pub async fn reset_all_votes(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    mutate_show(&state, &token, |show, _| {
        playback::reset_all_votes(show);
        Ok(())
    })
    .await?;

    Ok(Json(DataResponse {
        data: MessageResponse::success(),
    }))
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// GET /api/v1/plugin/viewer-control-mode
pub async fn viewer_control_mode(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let viewer_control_mode = read_show(&state, &token, playback::viewer_control_mode).await?;
    Ok(Json(DataResponse {
        data: ViewerControlModeResponse {
            viewer_control_mode,
        },
    }))
}

/// GET /api/v1/plugin/remote-preferences
pub async fn remote_preferences(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let preferences = read_show(&state, &token, playback::remote_preferences).await?;
    Ok(Json(DataResponse { data: preferences }))
}

/// POST /api/v1/plugin/toggle-viewer-control
///
/// Flips viewer control and restarts the play counter.
pub async fn toggle_viewer_control(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let viewer_control_enabled =
        mutate_show(&state, &token, |show, _| playback::toggle_viewer_control(show)).await?;

    tracing::info!(show_token = %token, viewer_control_enabled, "Viewer control toggled");
    Ok(Json(DataResponse {
        data: ViewerControlResponse {
            viewer_control_enabled,
        },
    }))
}

/// POST /api/v1/plugin/update-viewer-control
pub async fn update_viewer_control(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
    Json(input): Json<ViewerControlRequest>,
) -> AppResult<impl IntoResponse> {
    let viewer_control_enabled = mutate_show(&state, &token, |show, _| {
        playback::set_viewer_control(show, &input.viewer_control_enabled)
    })
    .await?;

    Ok(Json(DataResponse {
        data: ViewerControlResponse {
            viewer_control_enabled,
        },
    }))
}

/// POST /api/v1/plugin/update-managed-psa
pub async fn update_managed_psa(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
    Json(input): Json<ManagedPsaRequest>,
) -> AppResult<impl IntoResponse> {
    let managed_psa_enabled = mutate_show(&state, &token, |show, _| {
        playback::set_managed_psa(show, &input.managed_psa_enabled)
    })
    .await?;

    Ok(Json(DataResponse {
        data: ManagedPsaResponse {
            managed_psa_enabled,
        },
    }))
}

// ---------------------------------------------------------------------------
// Player bookkeeping
// ---------------------------------------------------------------------------

/// POST /api/v1/plugin/plugin-version
pub async fn plugin_version(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
    Json(input): Json<PluginVersionRequest>,
) -> AppResult<impl IntoResponse> {
    mutate_show(&state, &token, |show, _| {
        playback::record_plugin_version(
            show,
            input.plugin_version.clone(),
            input.fpp_version.clone(),
        );
        Ok(())
    })
    .await?;

    Ok(Json(DataResponse {
        data: MessageResponse::success(),
    }))
}

/// POST /api/v1/plugin/fpp-heartbeat
pub async fn fpp_heartbeat(
    ShowToken(token): ShowToken,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    mutate_show(&state, &token, |show, clock| {
        playback::record_heartbeat(show, clock);
        Ok(())
    })
    .await?;

    Ok(Json(DataResponse {
        data: MessageResponse::success(),
    }))
}
