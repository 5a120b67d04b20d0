//! Player-facing operations on the show aggregate.
//!
//! Each function here is one complete unit of work for one incoming player
//! call. Callers load the show, run exactly one of these, and persist the
//! whole aggregate in a single write.

use serde::Serialize;

use crate::catalog::{self, PlaylistEntry};
use crate::clock::Clock;
use crate::error::CoreError;
use crate::show::Show;
use crate::{psa, request_queue, visibility, vote_tally};

/// Index reported when there is nothing to play.
pub const NO_PLAYLIST_INDEX: i32 = -1;

/// Response to "what is next in the queue".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextPlaylist {
    pub next_playlist: Option<String>,
    pub playlist_index: i32,
}

impl NextPlaylist {
    pub fn none() -> Self {
        Self {
            next_playlist: None,
            playlist_index: NO_PLAYLIST_INDEX,
        }
    }
}

/// Response to "which playlist won the vote".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinningPlaylist {
    pub winning_playlist: Option<String>,
    pub playlist_index: i32,
}

impl WinningPlaylist {
    pub fn none() -> Self {
        Self {
            winning_playlist: None,
            playlist_index: NO_PLAYLIST_INDEX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemotePreferences {
    pub remote_subdomain: String,
    pub viewer_control_mode: &'static str,
}

// ---------------------------------------------------------------------------
// Jukebox queue
// ---------------------------------------------------------------------------

/// Pop the next request and hide its target for the configured window.
///
/// An empty queue returns [`NextPlaylist::none`] and leaves the show
/// untouched. Once the queue drains, `playing_next` falls back to the
/// schedule's next item.
pub fn next_in_queue(show: &mut Show) -> Result<NextPlaylist, CoreError> {
    let Some(head) = request_queue::peek_next(&show.requests) else {
        return Ok(NextPlaylist::none());
    };
    let target = head.sequence.clone();
    let hide_sequence_count = show.preferences()?.hide_sequence_count;

    visibility::suppress(
        &target,
        hide_sequence_count,
        &mut show.sequences,
        &mut show.sequence_groups,
    );
    let Some(popped) = request_queue::pop_next(&mut show.requests) else {
        return Ok(NextPlaylist::none());
    };

    if show.requests.is_empty() {
        show.playing_next = show.playing_next_from_schedule.clone();
    }

    Ok(NextPlaylist {
        playlist_index: popped.sequence.index.unwrap_or(NO_PLAYLIST_INDEX),
        next_playlist: Some(popped.sequence.name),
    })
}

/// Status message for the player's queue poll.
pub fn queue_status(show: &Show) -> &'static str {
    if show.requests.is_empty() {
        "Queue Empty"
    } else {
        "Success"
    }
}

/// Drop every pending request and vote.
pub fn purge_queue(show: &mut Show) {
    show.requests.clear();
    show.votes.clear();
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Reconcile the catalog with the player's playlists and prune PSAs whose
/// sequence disappeared. PSAs are switched off when none remain.
pub fn sync_playlists(
    show: &mut Show,
    playlists: &[PlaylistEntry],
    limit: usize,
) -> Result<(), CoreError> {
    let sequences = catalog::reconcile(&show.sequences, playlists, limit)?;

    let names: Vec<&str> = playlists.iter().map(|p| p.name.as_str()).collect();
    let psa_sequences = psa::retain_known(&show.psa_sequences, &names);
    if psa_sequences.is_empty() {
        if let Some(preferences) = show.preferences.as_mut() {
            preferences.psa_enabled = false;
        }
    }

    show.sequences = sequences;
    show.psa_sequences = psa_sequences;
    Ok(())
}

// ---------------------------------------------------------------------------
// Now playing
// ---------------------------------------------------------------------------

/// Record a now-playing transition.
///
/// An empty `playlist` clears all playback fields and nothing else. A
/// non-empty one advances the play counter, ages visibility windows, runs
/// the managed PSA cadence and clears transient viewer flags.
pub fn update_whats_playing(
    show: &mut Show,
    playlist: &str,
    clock: &dyn Clock,
) -> Result<(), CoreError> {
    let sequences_played = show.preferences()?.sequences_played;

    if playlist.is_empty() {
        show.clear_playing();
        return Ok(());
    }
    show.playing_now = playlist.to_string();

    let playing_grouped = show
        .find_sequence(playlist)
        .is_some_and(|sequence| sequence.is_grouped());
    // Grouped plays take one extra off the counter. This mirrors how the
    // player has always counted group members; see DESIGN.md before changing.
    let sequences_played =
        psa::count_play(sequences_played, show.is_psa(playlist), playing_grouped);
    show.preferences_mut()?.sequences_played = sequences_played;

    visibility::decay(&mut show.sequences, &mut show.sequence_groups);
    psa::inject_managed(show, sequences_played, clock.now());
    show.clear_viewer_flags();
    Ok(())
}

/// Record the schedule's next item, or clear playback fields when empty.
pub fn update_next_scheduled(show: &mut Show, sequence: &str) -> Result<(), CoreError> {
    show.preferences()?;
    if sequence.is_empty() {
        show.clear_playing();
    } else {
        show.playing_next_from_schedule = sequence.to_string();
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Voting
// ---------------------------------------------------------------------------

/// Resolve and consume the current vote winner.
pub fn highest_voted(show: &mut Show, clock: &dyn Clock) -> Result<WinningPlaylist, CoreError> {
    let winner = vote_tally::select_winner(show, clock)?;
    Ok(match winner {
        Some(winner) => WinningPlaylist {
            playlist_index: winner.index.unwrap_or(NO_PLAYLIST_INDEX),
            winning_playlist: Some(winner.name),
        },
        None => WinningPlaylist::none(),
    })
}

pub fn reset_all_votes(show: &mut Show) {
    show.votes.clear();
}

// ---------------------------------------------------------------------------
// Preferences and player bookkeeping
// ---------------------------------------------------------------------------

pub fn viewer_control_mode(show: &Show) -> Result<&'static str, CoreError> {
    Ok(show.preferences()?.viewer_control_mode.as_str())
}

pub fn remote_preferences(show: &Show) -> Result<RemotePreferences, CoreError> {
    Ok(RemotePreferences {
        remote_subdomain: show.show_subdomain.clone(),
        viewer_control_mode: viewer_control_mode(show)?,
    })
}

/// Flip viewer control and restart the play counter. Returns the new state.
pub fn toggle_viewer_control(show: &mut Show) -> Result<bool, CoreError> {
    let preferences = show.preferences_mut()?;
    preferences.viewer_control_enabled = !preferences.viewer_control_enabled;
    preferences.sequences_played = 0;
    Ok(preferences.viewer_control_enabled)
}

/// Player flags arrive as `"Y"`/`"N"`; anything but `Y` means off.
fn flag_enabled(flag: &str) -> bool {
    flag.eq_ignore_ascii_case("y")
}

pub fn set_viewer_control(show: &mut Show, flag: &str) -> Result<bool, CoreError> {
    let enabled = flag_enabled(flag);
    show.preferences_mut()?.viewer_control_enabled = enabled;
    Ok(enabled)
}

pub fn set_managed_psa(show: &mut Show, flag: &str) -> Result<bool, CoreError> {
    let enabled = flag_enabled(flag);
    show.preferences_mut()?.manage_psa = enabled;
    Ok(enabled)
}

pub fn record_plugin_version(
    show: &mut Show,
    plugin_version: Option<String>,
    fpp_version: Option<String>,
) {
    show.plugin_version = plugin_version;
    show.fpp_version = fpp_version;
}

pub fn record_heartbeat(show: &mut Show, clock: &dyn Clock) {
    show.last_fpp_heartbeat = Some(clock.now());
}
