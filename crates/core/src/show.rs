//! The show aggregate and everything it owns.
//!
//! A [`Show`] is loaded, mutated in memory by exactly one operation, and
//! handed back for persistence as a single write. Requests and votes hold
//! an owned snapshot of the [`Sequence`] taken when they were created; any
//! join back to the live catalog is an explicit lookup by name.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Playlist type assigned when the player does not report one.
pub const DEFAULT_SEQUENCE_TYPE: &str = "SEQUENCE";

/// Sequence names are identity keys and compare case-insensitively.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

pub fn same_name(a: &str, b: &str) -> bool {
    a == b || normalize_name(a) == normalize_name(b)
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// How the next item is chosen when viewers are in control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewerControlMode {
    Jukebox,
    Voting,
    Scheduled,
}

impl ViewerControlMode {
    /// Lowercase name reported to the player plugin.
    pub fn as_str(self) -> &'static str {
        match self {
            ViewerControlMode::Jukebox => "jukebox",
            ViewerControlMode::Voting => "voting",
            ViewerControlMode::Scheduled => "scheduled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub viewer_control_mode: ViewerControlMode,
    #[serde(default)]
    pub viewer_control_enabled: bool,
    /// Number of subsequent plays a just-played item stays hidden for.
    #[serde(default)]
    pub hide_sequence_count: i32,
    #[serde(default)]
    pub psa_enabled: bool,
    #[serde(default)]
    pub manage_psa: bool,
    /// A PSA is due every `psa_frequency` plays. Zero or less disables cadence.
    #[serde(default)]
    pub psa_frequency: i32,
    #[serde(default)]
    pub reset_votes: bool,
    #[serde(default)]
    pub sequences_played: i32,
}

impl Preferences {
    pub fn new(viewer_control_mode: ViewerControlMode) -> Self {
        Self {
            viewer_control_mode,
            viewer_control_enabled: false,
            hide_sequence_count: 0,
            psa_enabled: false,
            manage_psa: false,
            psa_frequency: 0,
            reset_votes: false,
            sequences_played: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub duration: Option<i32>,
    /// Playback handle on the player. `None` once dropped from the catalog.
    #[serde(default)]
    pub index: Option<i32>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub visible: bool,
    /// Remaining plays this sequence stays hidden for.
    #[serde(default)]
    pub visibility_count: i32,
    /// Owning group name; empty when ungrouped.
    #[serde(default)]
    pub group: String,
    #[serde(default = "default_sequence_type", rename = "type")]
    pub kind: String,
}

fn default_sequence_type() -> String {
    DEFAULT_SEQUENCE_TYPE.to_string()
}

impl Sequence {
    /// A fresh, active, visible and ungrouped sequence.
    pub fn new(name: impl Into<String>, index: i32, order: i32) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            duration: None,
            index: Some(index),
            order,
            active: true,
            visible: true,
            visibility_count: 0,
            group: String::new(),
            kind: default_sequence_type(),
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn is_grouped(&self) -> bool {
        !self.group.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceGroup {
    pub name: String,
    #[serde(default)]
    pub visibility_count: i32,
}

impl SequenceGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility_count: 0,
        }
    }
}

/// A sequence flagged for mandatory rotation.
///
/// Entries with no `last_played` or no `order` are uninitialized and never
/// selected by rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsaSequence {
    pub name: String,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub last_played: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Requests and votes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub sequence: Sequence,
    /// Queue order; lowest plays first. Not necessarily contiguous.
    pub position: i32,
    #[serde(default)]
    pub owner_requested: bool,
    /// Cleared on every playback tick.
    #[serde(default)]
    pub viewer_requested: Option<String>,
}

/// What a vote was cast for. A vote targets exactly one of the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteTarget {
    Sequence(Sequence),
    SequenceGroup(SequenceGroup),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub target: VoteTarget,
    pub votes: i32,
    pub last_vote_time: Timestamp,
    #[serde(default)]
    pub owner_voted: bool,
    /// Cleared on every playback tick.
    #[serde(default)]
    pub viewers_voted: Vec<String>,
}

impl Vote {
    /// A system-cast vote for a sequence snapshot.
    pub fn for_sequence(sequence: Sequence, votes: i32, at: Timestamp) -> Self {
        Self {
            target: VoteTarget::Sequence(sequence),
            votes,
            last_vote_time: at,
            owner_voted: false,
            viewers_voted: Vec::new(),
        }
    }

    pub fn for_group(group: SequenceGroup, votes: i32, at: Timestamp) -> Self {
        Self {
            target: VoteTarget::SequenceGroup(group),
            votes,
            last_vote_time: at,
            owner_voted: false,
            viewers_voted: Vec::new(),
        }
    }

    pub fn sequence(&self) -> Option<&Sequence> {
        match &self.target {
            VoteTarget::Sequence(sequence) => Some(sequence),
            VoteTarget::SequenceGroup(_) => None,
        }
    }

    /// True for group votes and for votes on a sequence that belongs to a group.
    pub fn is_grouped(&self) -> bool {
        match &self.target {
            VoteTarget::Sequence(sequence) => sequence.is_grouped(),
            VoteTarget::SequenceGroup(_) => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingWin {
    pub name: String,
    pub date_time: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub voting_win: Vec<VotingWin>,
}

impl Stats {
    pub fn record_win(&mut self, name: &str, at: Timestamp) {
        self.voting_win.push(VotingWin {
            name: name.to_string(),
            date_time: at,
        });
    }

    /// Wins logged strictly after `since`.
    pub fn wins_since(&self, since: Timestamp) -> usize {
        self.voting_win
            .iter()
            .filter(|win| win.date_time > since)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Aggregate root
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub show_token: String,
    #[serde(default)]
    pub show_subdomain: String,
    #[serde(default)]
    pub preferences: Option<Preferences>,
    #[serde(default)]
    pub sequences: Vec<Sequence>,
    #[serde(default)]
    pub sequence_groups: Vec<SequenceGroup>,
    #[serde(default)]
    pub psa_sequences: Vec<PsaSequence>,
    #[serde(default)]
    pub requests: Vec<Request>,
    #[serde(default)]
    pub votes: Vec<Vote>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub playing_now: String,
    #[serde(default)]
    pub playing_next: String,
    #[serde(default)]
    pub playing_next_from_schedule: String,
    #[serde(default)]
    pub plugin_version: Option<String>,
    #[serde(default)]
    pub fpp_version: Option<String>,
    #[serde(default)]
    pub last_fpp_heartbeat: Option<Timestamp>,
}

impl Show {
    pub fn new(show_token: impl Into<String>, preferences: Option<Preferences>) -> Self {
        Self {
            show_token: show_token.into(),
            show_subdomain: String::new(),
            preferences,
            sequences: Vec::new(),
            sequence_groups: Vec::new(),
            psa_sequences: Vec::new(),
            requests: Vec::new(),
            votes: Vec::new(),
            stats: Stats::default(),
            playing_now: String::new(),
            playing_next: String::new(),
            playing_next_from_schedule: String::new(),
            plugin_version: None,
            fpp_version: None,
            last_fpp_heartbeat: None,
        }
    }

    pub fn preferences(&self) -> Result<&Preferences, CoreError> {
        self.preferences.as_ref().ok_or(CoreError::PreferencesMissing)
    }

    pub fn preferences_mut(&mut self) -> Result<&mut Preferences, CoreError> {
        self.preferences.as_mut().ok_or(CoreError::PreferencesMissing)
    }

    pub fn find_sequence(&self, name: &str) -> Option<&Sequence> {
        self.sequences.iter().find(|s| same_name(&s.name, name))
    }

    pub fn find_sequence_mut(&mut self, name: &str) -> Option<&mut Sequence> {
        self.sequences.iter_mut().find(|s| same_name(&s.name, name))
    }

    pub fn find_group(&self, name: &str) -> Option<&SequenceGroup> {
        self.sequence_groups.iter().find(|g| same_name(&g.name, name))
    }

    pub fn is_psa(&self, name: &str) -> bool {
        !name.is_empty() && self.psa_sequences.iter().any(|p| same_name(&p.name, name))
    }

    /// Whether the item currently on stage is itself a PSA.
    pub fn is_psa_playing_now(&self) -> bool {
        self.is_psa(&self.playing_now)
    }

    /// Drop transient viewer identifiers from every pending request and vote.
    pub fn clear_viewer_flags(&mut self) {
        for request in &mut self.requests {
            request.viewer_requested = None;
        }
        for vote in &mut self.votes {
            vote.viewers_voted.clear();
        }
    }

    /// Reset all three playback display fields.
    pub fn clear_playing(&mut self) {
        self.playing_now.clear();
        self.playing_next.clear();
        self.playing_next_from_schedule.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn names_compare_case_insensitively() {
        assert!(same_name("Jingle Bells", "JINGLE bells"));
        assert!(!same_name("Jingle Bells", "Jingle Bell"));
    }

    #[test]
    fn group_vote_counts_as_grouped() {
        let at = Utc.with_ymd_and_hms(2024, 12, 1, 18, 0, 0).unwrap();
        let vote = Vote::for_group(SequenceGroup::new("Finale"), 1, at);
        assert!(vote.is_grouped());
        assert!(vote.sequence().is_none());
    }

    #[test]
    fn vote_for_grouped_sequence_counts_as_grouped() {
        let at = Utc.with_ymd_and_hms(2024, 12, 1, 18, 0, 0).unwrap();
        let solo = Vote::for_sequence(Sequence::new("Solo", 1, 1), 1, at);
        let grouped = Vote::for_sequence(Sequence::new("Part1", 2, 2).in_group("Finale"), 1, at);
        assert!(!solo.is_grouped());
        assert!(grouped.is_grouped());
    }

    #[test]
    fn missing_preferences_is_an_error() {
        let show = Show::new("token", None);
        assert!(matches!(
            show.preferences(),
            Err(CoreError::PreferencesMissing)
        ));
    }

    #[test]
    fn wins_since_is_exclusive() {
        let midnight = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
        let mut stats = Stats::default();
        stats.record_win("A", midnight);
        stats.record_win("B", midnight + chrono::Duration::hours(1));
        assert_eq!(stats.wins_since(midnight), 1);
    }

    #[test]
    fn clear_viewer_flags_keeps_entries() {
        let at = Utc.with_ymd_and_hms(2024, 12, 1, 18, 0, 0).unwrap();
        let mut show = Show::new("token", None);
        show.requests.push(Request {
            sequence: Sequence::new("A", 1, 1),
            position: 1,
            owner_requested: false,
            viewer_requested: Some("10.0.0.1".into()),
        });
        let mut vote = Vote::for_sequence(Sequence::new("B", 2, 2), 3, at);
        vote.viewers_voted = vec!["10.0.0.2".into()];
        show.votes.push(vote);

        show.clear_viewer_flags();

        assert_eq!(show.requests.len(), 1);
        assert!(show.requests[0].viewer_requested.is_none());
        assert_eq!(show.votes[0].votes, 3);
        assert!(show.votes[0].viewers_voted.is_empty());
    }

    #[test]
    fn sequence_type_defaults_when_absent() {
        let json = serde_json::json!({ "name": "A" });
        let sequence: Sequence = serde_json::from_value(json).unwrap();
        assert_eq!(sequence.kind, DEFAULT_SEQUENCE_TYPE);
        assert!(sequence.index.is_none());
        assert!(!sequence.is_grouped());
    }

    #[test]
    fn viewer_control_mode_wire_names() {
        let json = serde_json::to_value(ViewerControlMode::Jukebox).unwrap();
        assert_eq!(json, "JUKEBOX");
        assert_eq!(ViewerControlMode::Voting.as_str(), "voting");
    }
}
