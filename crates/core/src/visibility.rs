//! Hide recently played items for a configurable number of plays.
//!
//! Only the counters are maintained here. Excluding hidden items from
//! request/vote admission happens wherever admission is decided.

use crate::show::{same_name, Sequence, SequenceGroup};

/// Suppress the item a play targets.
///
/// A grouped sequence suppresses its group; an ungrouped one suppresses
/// itself. The counter is set to `hide_sequence_count + 1` because the
/// next now-playing tick (the play itself) immediately consumes one.
/// No-op when `hide_sequence_count` is zero or the item is not in the
/// catalog.
pub fn suppress(
    target: &Sequence,
    hide_sequence_count: i32,
    sequences: &mut [Sequence],
    groups: &mut [SequenceGroup],
) {
    if hide_sequence_count == 0 {
        return;
    }
    if target.is_grouped() {
        suppress_group(&target.group, hide_sequence_count, groups);
    } else if let Some(sequence) = sequences.iter_mut().find(|s| same_name(&s.name, &target.name)) {
        sequence.visibility_count = hide_sequence_count + 1;
    }
}

/// Suppress a group by name. No-op when `hide_sequence_count` is zero.
pub fn suppress_group(group_name: &str, hide_sequence_count: i32, groups: &mut [SequenceGroup]) {
    if hide_sequence_count == 0 {
        return;
    }
    if let Some(group) = groups.iter_mut().find(|g| same_name(&g.name, group_name)) {
        group.visibility_count = hide_sequence_count + 1;
    }
}

/// Age every positive counter by one play. Counters never go negative.
pub fn decay(sequences: &mut [Sequence], groups: &mut [SequenceGroup]) {
    for sequence in sequences.iter_mut().filter(|s| s.visibility_count > 0) {
        sequence.visibility_count -= 1;
    }
    for group in groups.iter_mut().filter(|g| g.visibility_count > 0) {
        group.visibility_count -= 1;
    }
}
