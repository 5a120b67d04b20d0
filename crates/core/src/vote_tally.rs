//! Vote winner selection and sequence-group expansion.
//!
//! A round ends when a winner is taken off the tally. Group wins are
//! resolved to exactly one play: the group's first active member wins now
//! and the remaining members are seeded back at descending priority so
//! they follow in the next rounds.

use serde::Serialize;

use crate::clock::Clock;
use crate::error::CoreError;
use crate::show::{same_name, Sequence, Show, Vote, VoteTarget};
use crate::{psa, visibility};

/// Synthetic vote count for the member that plays on a group win.
pub const GROUP_WINNER_VOTES: i32 = 2099;

/// The sequence chosen to play next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Winner {
    pub name: String,
    pub index: Option<i32>,
}

/// Index of the leading vote: most votes, then earliest `last_vote_time`.
///
/// The oldest waiting vote wins a tie; on a full tie the earliest entry wins.
pub fn leading_vote(votes: &[Vote]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, vote) in votes.iter().enumerate() {
        let leads = match best {
            None => true,
            Some(b) => {
                let current = &votes[b];
                vote.votes > current.votes
                    || (vote.votes == current.votes && vote.last_vote_time < current.last_vote_time)
            }
        };
        if leads {
            best = Some(i);
        }
    }
    best
}

/// Take the winning vote off the tally and resolve it to a playable sequence.
///
/// Returns `Ok(None)` when the tally is empty, or when the winner cannot be
/// resolved (a group with no active members, a sequence no longer in the
/// catalog). The unresolvable vote is still consumed so it cannot block
/// later rounds.
pub fn select_winner(show: &mut Show, clock: &dyn Clock) -> Result<Option<Winner>, CoreError> {
    let Some(i) = leading_vote(&show.votes) else {
        return Ok(None);
    };
    show.preferences()?;

    let vote = show.votes.remove(i);
    match vote.target {
        VoteTarget::SequenceGroup(group) => expand_group_win(show, &group.name, clock),
        VoteTarget::Sequence(sequence) => resolve_sequence_win(show, &sequence, clock),
    }
}

fn expand_group_win(
    show: &mut Show,
    group_name: &str,
    clock: &dyn Clock,
) -> Result<Option<Winner>, CoreError> {
    let Some(group) = show.find_group(group_name).cloned() else {
        return Ok(None);
    };
    let mut members: Vec<Sequence> = show
        .sequences
        .iter()
        .filter(|s| s.active && same_name(&s.group, &group.name))
        .cloned()
        .collect();
    if members.is_empty() {
        return Ok(None);
    }

    let now = clock.now();
    let hide_sequence_count = show.preferences()?.hide_sequence_count;
    show.stats.record_win(&group.name, now);
    visibility::suppress_group(&group.name, hide_sequence_count, &mut show.sequence_groups);

    // The first member takes the GROUP_WINNER_VOTES slot and plays now.
    let first = members.remove(0);
    for (votes, member) in (1..).map(|k| GROUP_WINNER_VOTES - k).zip(members) {
        show.votes.push(Vote::for_sequence(member, votes, now));
    }

    resolve_sequence_win(show, &first, clock)
}

fn resolve_sequence_win(
    show: &mut Show,
    winning: &Sequence,
    clock: &dyn Clock,
) -> Result<Option<Winner>, CoreError> {
    let is_psa = show.is_psa(&winning.name);
    let Some(actual) = show.find_sequence(&winning.name).cloned() else {
        return Ok(None);
    };
    let (reset_votes, hide_sequence_count) = {
        let preferences = show.preferences()?;
        (preferences.reset_votes, preferences.hide_sequence_count)
    };
    let now = clock.now();

    // A round only concludes once no grouped contest is still pending.
    let grouped_pending = show.votes.iter().any(Vote::is_grouped);
    if !grouped_pending && !is_psa && reset_votes {
        show.votes.clear();
    }

    if !actual.is_grouped() {
        visibility::suppress(
            &actual,
            hide_sequence_count,
            &mut show.sequences,
            &mut show.sequence_groups,
        );
    }

    if !actual.is_grouped() && !is_psa {
        show.stats.record_win(&actual.name, now);
        let wins_today = show.stats.wins_since(clock.start_of_day());
        psa::inject_unmanaged(show, wins_today, now);
    }

    Ok(Some(Winner {
        name: actual.name,
        index: actual.index,
    }))
}
