//! Reconcile the sequence catalog against the player's playlist snapshot.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::show::{normalize_name, Sequence, DEFAULT_SEQUENCE_TYPE};

/// Default cap on the number of distinct sequences a show may hold.
pub const DEFAULT_SEQUENCE_LIMIT: usize = 200;

/// One playlist as reported by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub name: String,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub index: Option<i32>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl PlaylistEntry {
    fn index_or_unset(&self) -> i32 {
        self.index.unwrap_or(-1)
    }

    fn kind_or_default(&self) -> String {
        self.kind
            .clone()
            .unwrap_or_else(|| DEFAULT_SEQUENCE_TYPE.to_string())
    }
}

/// Reject snapshots that would push the catalog past `limit`.
///
/// Counts both the raw snapshot length and the distinct union of existing
/// and incoming names.
fn check_capacity(
    current: &[Sequence],
    incoming: &[PlaylistEntry],
    limit: usize,
) -> Result<(), CoreError> {
    if incoming.len() > limit {
        return Err(CoreError::CapacityExceeded { limit });
    }
    let combined: HashSet<String> = current
        .iter()
        .map(|s| s.name.as_str())
        .chain(incoming.iter().map(|p| p.name.as_str()))
        .filter(|name| !name.is_empty())
        .map(normalize_name)
        .collect();
    if combined.len() > limit {
        return Err(CoreError::CapacityExceeded { limit });
    }
    Ok(())
}

/// Build the new catalog from the current one and an incoming snapshot.
///
/// - Existing sequences missing from the snapshot become inactive, lose
///   their index, and are ranked after the snapshot starting at
///   `incoming.len() + 1`, in their current relative order.
/// - Existing sequences present in the snapshot take its index, duration
///   and type and become active; their `order` is kept.
/// - New names are appended as active, visible sequences. The first takes
///   the highest surviving active order (0 when none), and each following
///   one counts up from there.
///
/// Names match case-insensitively; the first snapshot entry for a name
/// wins. Nothing is returned on a capacity error.
pub fn reconcile(
    current: &[Sequence],
    incoming: &[PlaylistEntry],
    limit: usize,
) -> Result<Vec<Sequence>, CoreError> {
    check_capacity(current, incoming, limit)?;

    let mut snapshot: HashMap<String, &PlaylistEntry> = HashMap::new();
    let mut snapshot_order: Vec<&PlaylistEntry> = Vec::new();
    for entry in incoming.iter().filter(|p| !p.name.is_empty()) {
        let key = normalize_name(&entry.name);
        if !snapshot.contains_key(&key) {
            snapshot.insert(key, entry);
            snapshot_order.push(entry);
        }
    }

    let mut last_active_order = current
        .iter()
        .filter(|s| s.active && snapshot.contains_key(&normalize_name(&s.name)))
        .map(|s| s.order)
        .max()
        .unwrap_or(0);

    let mut inactive_order = incoming.len() as i32 + 1;
    let mut seen: HashSet<String> = HashSet::new();
    let mut updated = Vec::with_capacity(current.len() + snapshot_order.len());

    for existing in current {
        let key = normalize_name(&existing.name);
        match snapshot.get(&key) {
            Some(entry) => {
                if !seen.insert(key) {
                    continue;
                }
                let mut sequence = existing.clone();
                sequence.index = Some(entry.index_or_unset());
                sequence.duration = entry.duration;
                sequence.kind = entry.kind_or_default();
                sequence.active = true;
                updated.push(sequence);
            }
            None => {
                let mut sequence = existing.clone();
                sequence.active = false;
                sequence.index = None;
                sequence.order = inactive_order;
                inactive_order += 1;
                updated.push(sequence);
            }
        }
    }

    for entry in snapshot_order {
        if seen.contains(&normalize_name(&entry.name)) {
            continue;
        }
        // The first new item shares the highest active order.
        let mut sequence =
            Sequence::new(entry.name.clone(), entry.index_or_unset(), last_active_order);
        sequence.duration = entry.duration;
        sequence.kind = entry.kind_or_default();
        updated.push(sequence);
        last_active_order += 1;
    }

    Ok(updated)
}
