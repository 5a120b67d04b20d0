//! Show row model.
//!
//! The `shows` table stores the whole aggregate in one row. Collections are
//! JSONB columns decoded straight into the core types.

use serde::Deserialize;
use showplay_core::show::{
    Preferences, PsaSequence, Request, Sequence, SequenceGroup, Show, Stats, Vote,
};
use showplay_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `shows` table.
#[derive(Debug, Clone, FromRow)]
pub struct ShowRow {
    pub id: DbId,
    pub show_token: String,
    pub show_subdomain: String,
    pub preferences: Option<Json<Preferences>>,
    pub sequences: Json<Vec<Sequence>>,
    pub sequence_groups: Json<Vec<SequenceGroup>>,
    pub psa_sequences: Json<Vec<PsaSequence>>,
    pub requests: Json<Vec<Request>>,
    pub votes: Json<Vec<Vote>>,
    pub stats: Json<Stats>,
    pub playing_now: String,
    pub playing_next: String,
    pub playing_next_from_schedule: String,
    pub plugin_version: Option<String>,
    pub fpp_version: Option<String>,
    pub last_fpp_heartbeat: Option<Timestamp>,
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A loaded show plus the concurrency token it was read at.
///
/// `version` must be handed back unchanged to [`crate::repositories::ShowRepo::save`];
/// a mismatch means another writer landed first.
#[derive(Debug, Clone)]
pub struct ShowRecord {
    pub id: DbId,
    pub version: i64,
    pub show: Show,
}

impl From<ShowRow> for ShowRecord {
    fn from(row: ShowRow) -> Self {
        Self {
            id: row.id,
            version: row.version,
            show: Show {
                show_token: row.show_token,
                show_subdomain: row.show_subdomain,
                preferences: row.preferences.map(|p| p.0),
                sequences: row.sequences.0,
                sequence_groups: row.sequence_groups.0,
                psa_sequences: row.psa_sequences.0,
                requests: row.requests.0,
                votes: row.votes.0,
                stats: row.stats.0,
                playing_now: row.playing_now,
                playing_next: row.playing_next,
                playing_next_from_schedule: row.playing_next_from_schedule,
                plugin_version: row.plugin_version,
                fpp_version: row.fpp_version,
                last_fpp_heartbeat: row.last_fpp_heartbeat,
            },
        }
    }
}

/// DTO for provisioning a new show.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShow {
    pub show_token: String,
    #[serde(default)]
    pub show_subdomain: String,
    pub preferences: Option<Preferences>,
}
