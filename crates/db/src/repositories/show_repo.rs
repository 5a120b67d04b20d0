//! Repository for the `shows` table.

use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::show::{CreateShow, ShowRecord, ShowRow};

/// Column list for the `shows` table.
const COLUMNS: &str = "id, show_token, show_subdomain, preferences, sequences, \
    sequence_groups, psa_sequences, requests, votes, stats, playing_now, playing_next, \
    playing_next_from_schedule, plugin_version, fpp_version, last_fpp_heartbeat, \
    version, created_at, updated_at";

/// Result of an optimistic save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The row was written; it now carries `version`.
    Saved { version: i64 },
    /// Another writer changed the row since it was loaded. Nothing was written.
    Conflict,
}

/// Loads and stores whole show aggregates.
pub struct ShowRepo;

impl ShowRepo {
    /// Insert a new show with an empty catalog.
    pub async fn create(pool: &PgPool, input: &CreateShow) -> Result<ShowRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO shows (show_token, show_subdomain, preferences) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ShowRow>(&query)
            .bind(&input.show_token)
            .bind(&input.show_subdomain)
            .bind(input.preferences.as_ref().map(Json))
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    /// Find a show by its external token.
    pub async fn find_by_token(
        pool: &PgPool,
        show_token: &str,
    ) -> Result<Option<ShowRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shows WHERE show_token = $1");
        let row = sqlx::query_as::<_, ShowRow>(&query)
            .bind(show_token)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(ShowRecord::from))
    }

    /// Write every field of the aggregate in one statement.
    ///
    /// The update only applies if the row is still at `record.version`;
    /// otherwise [`SaveOutcome::Conflict`] is returned and the caller should
    /// reload and retry.
    pub async fn save(pool: &PgPool, record: &ShowRecord) -> Result<SaveOutcome, sqlx::Error> {
        let show = &record.show;
        let version: Option<(i64,)> = sqlx::query_as(
            "UPDATE shows SET \
                show_subdomain = $3, \
                preferences = $4, \
                sequences = $5, \
                sequence_groups = $6, \
                psa_sequences = $7, \
                requests = $8, \
                votes = $9, \
                stats = $10, \
                playing_now = $11, \
                playing_next = $12, \
                playing_next_from_schedule = $13, \
                plugin_version = $14, \
                fpp_version = $15, \
                last_fpp_heartbeat = $16, \
                version = version + 1, \
                updated_at = NOW() \
             WHERE id = $1 AND version = $2 \
             RETURNING version",
        )
        .bind(record.id)
        .bind(record.version)
        .bind(&show.show_subdomain)
        .bind(show.preferences.as_ref().map(Json))
        .bind(Json(&show.sequences))
        .bind(Json(&show.sequence_groups))
        .bind(Json(&show.psa_sequences))
        .bind(Json(&show.requests))
        .bind(Json(&show.votes))
        .bind(Json(&show.stats))
        .bind(&show.playing_now)
        .bind(&show.playing_next)
        .bind(&show.playing_next_from_schedule)
        .bind(&show.plugin_version)
        .bind(&show.fpp_version)
        .bind(show.last_fpp_heartbeat)
        .fetch_optional(pool)
        .await?;

        Ok(match version {
            Some((version,)) => SaveOutcome::Saved { version },
            None => {
                tracing::debug!(
                    show_token = %show.show_token,
                    loaded_version = record.version,
                    "Show changed since load; save skipped",
                );
                SaveOutcome::Conflict
            }
        })
    }
}
