//! Scheduled announcement (PSA) rotation and cadence.
//!
//! Two triggers share one rotation rule:
//!
//! - **Managed** (`manage_psa = true`): evaluated on every now-playing tick
//!   against the running `sequences_played` counter.
//! - **Unmanaged** (`manage_psa = false`): evaluated inside vote winner
//!   selection against the number of voting wins logged today.

use crate::request_queue;
use crate::show::{same_name, Preferences, PsaSequence, Sequence, Show, ViewerControlMode, Vote};
use crate::types::Timestamp;

/// Vote count given to an injected PSA so it outranks viewer votes.
pub const PSA_VOTE_PRIORITY: i32 = 2000;

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

/// Index of the PSA due next: oldest `last_played`, then lowest `order`.
///
/// Entries missing either field are skipped.
pub fn next_in_rotation(psa_sequences: &[PsaSequence]) -> Option<usize> {
    psa_sequences
        .iter()
        .enumerate()
        .filter_map(|(i, psa)| Some((i, psa.last_played?, psa.order?)))
        .min_by_key(|&(_, last_played, order)| (last_played, order))
        .map(|(i, _, _)| i)
}

// ---------------------------------------------------------------------------
// Play counting
// ---------------------------------------------------------------------------

/// New value of `sequences_played` after a non-empty now-playing tick.
///
/// A PSA resets the count to zero; anything else adds one. A grouped
/// sequence then takes one extra away, so group members do not advance the
/// cadence the way solo plays do.
pub fn count_play(sequences_played: i32, playing_psa: bool, playing_grouped: bool) -> i32 {
    let mut played = if playing_psa { 0 } else { sequences_played + 1 };
    if playing_grouped {
        played -= 1;
    }
    played
}

// ---------------------------------------------------------------------------
// Cadence
// ---------------------------------------------------------------------------

/// Whether the managed trigger fires for this play count.
pub fn managed_due(preferences: &Preferences, sequences_played: i32) -> bool {
    sequences_played != 0
        && preferences.psa_enabled
        && preferences.manage_psa
        && preferences.psa_frequency > 0
        && sequences_played % preferences.psa_frequency == 0
}

/// Whether the unmanaged trigger fires for this many wins today.
pub fn unmanaged_due(preferences: &Preferences, wins_today: usize) -> bool {
    preferences.psa_enabled
        && !preferences.manage_psa
        && preferences.psa_frequency > 0
        && wins_today % preferences.psa_frequency as usize == 0
}

/// Whether any pending vote is already for a PSA.
pub fn psa_vote_pending(show: &Show) -> bool {
    show.votes
        .iter()
        .filter_map(Vote::sequence)
        .any(|sequence| show.is_psa(&sequence.name))
}

/// Pick the rotation PSA, stamp it as played, and return its catalog entry.
///
/// `None` when no PSA is eligible. The stamp is applied even if the PSA's
/// sequence is no longer in the catalog, so rotation still advances.
fn take_rotation_psa(show: &mut Show, now: Timestamp) -> Option<Option<Sequence>> {
    let i = next_in_rotation(&show.psa_sequences)?;
    let psa = &mut show.psa_sequences[i];
    psa.last_played = Some(now);
    let name = psa.name.clone();
    Some(show.find_sequence(&name).cloned())
}

// ---------------------------------------------------------------------------
// Injection per viewer-control mode
// ---------------------------------------------------------------------------

fn inject_jukebox(show: &mut Show, sequence: Sequence, now: Timestamp) {
    show.votes
        .push(Vote::for_sequence(sequence.clone(), PSA_VOTE_PRIORITY, now));
    request_queue::enqueue(&mut show.requests, sequence);
}

fn inject_voting(show: &mut Show, sequence: Sequence, now: Timestamp) {
    show.votes
        .push(Vote::for_sequence(sequence, PSA_VOTE_PRIORITY, now));
}

fn inject_scheduled(_show: &mut Show, _sequence: Sequence, _now: Timestamp) {}

fn inject_for_mode(mode: ViewerControlMode, show: &mut Show, sequence: Sequence, now: Timestamp) {
    match mode {
        ViewerControlMode::Jukebox => inject_jukebox(show, sequence, now),
        ViewerControlMode::Voting => inject_voting(show, sequence, now),
        ViewerControlMode::Scheduled => inject_scheduled(show, sequence, now),
    }
}

/// Managed trigger. Returns the name of the injected PSA, if any.
///
/// `show.playing_now` must already hold the item that just started.
pub fn inject_managed(show: &mut Show, sequences_played: i32, now: Timestamp) -> Option<String> {
    if show.psa_sequences.is_empty() {
        return None;
    }
    let preferences = show.preferences.as_ref()?;
    if !managed_due(preferences, sequences_played) {
        return None;
    }
    let mode = preferences.viewer_control_mode;
    if next_in_rotation(&show.psa_sequences).is_none() || show.is_psa_playing_now() {
        return None;
    }

    let sequence = take_rotation_psa(show, now)??;
    let name = sequence.name.clone();
    inject_for_mode(mode, show, sequence, now);
    Some(name)
}

/// Unmanaged trigger. Returns the name of the injected PSA, if any.
///
/// Injects a single high-priority vote, never a request, and never while a
/// PSA vote is already pending.
pub fn inject_unmanaged(show: &mut Show, wins_today: usize, now: Timestamp) -> Option<String> {
    if show.psa_sequences.is_empty() {
        return None;
    }
    let preferences = show.preferences.as_ref()?;
    if !unmanaged_due(preferences, wins_today) || show.is_psa_playing_now() {
        return None;
    }

    let sequence = take_rotation_psa(show, now)??;
    if psa_vote_pending(show) {
        return None;
    }
    let name = sequence.name.clone();
    inject_voting(show, sequence, now);
    Some(name)
}

/// Keep only PSAs whose sequence is still in `names`.
pub fn retain_known(psa_sequences: &[PsaSequence], names: &[&str]) -> Vec<PsaSequence> {
    psa_sequences
        .iter()
        .filter(|psa| names.iter().any(|name| same_name(name, &psa.name)))
        .cloned()
        .collect()
}
