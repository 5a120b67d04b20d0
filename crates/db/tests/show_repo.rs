//! Integration tests for the show repository.
//!
//! Exercises the repository layer against a real database:
//! - Provisioning and lookup by token
//! - Full-aggregate round trip through the JSONB columns
//! - Optimistic concurrency on save

use chrono::{TimeZone, Utc};
use showplay_core::show::{
    Preferences, PsaSequence, Request, Sequence, SequenceGroup, ViewerControlMode, Vote,
};
use showplay_db::models::show::CreateShow;
use showplay_db::repositories::{SaveOutcome, ShowRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_show(token: &str) -> CreateShow {
    CreateShow {
        show_token: token.to_string(),
        show_subdomain: "lights".to_string(),
        preferences: Some(Preferences::new(ViewerControlMode::Jukebox)),
    }
}

// ---------------------------------------------------------------------------
// Test: create and find
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_find_by_token(pool: PgPool) {
    let created = ShowRepo::create(&pool, &new_show("abc123")).await.unwrap();
    assert_eq!(created.version, 0);
    assert_eq!(created.show.show_token, "abc123");
    assert!(created.show.sequences.is_empty());
    assert!(created.show.stats.voting_win.is_empty());

    let found = ShowRepo::find_by_token(&pool, "abc123")
        .await
        .unwrap()
        .expect("show should exist");
    assert_eq!(found.id, created.id);
    assert_eq!(found.show, created.show);

    let missing = ShowRepo::find_by_token(&pool, "nope").await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_token_rejected(pool: PgPool) {
    ShowRepo::create(&pool, &new_show("dup")).await.unwrap();
    let err = ShowRepo::create(&pool, &new_show("dup")).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_shows_show_token"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_show_without_preferences_round_trips(pool: PgPool) {
    let input = CreateShow {
        preferences: None,
        ..new_show("bare")
    };
    ShowRepo::create(&pool, &input).await.unwrap();
    let found = ShowRepo::find_by_token(&pool, "bare").await.unwrap().unwrap();
    assert!(found.show.preferences.is_none());
}

// ---------------------------------------------------------------------------
// Test: save round trip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_persists_whole_aggregate(pool: PgPool) {
    let mut record = ShowRepo::create(&pool, &new_show("full")).await.unwrap();
    let at = Utc.with_ymd_and_hms(2024, 12, 24, 18, 30, 0).unwrap();

    let song = Sequence::new("Song", 1, 1);
    let part = Sequence::new("Part", 2, 2).in_group("Finale");
    record.show.sequences = vec![song.clone(), part];
    record.show.sequence_groups = vec![SequenceGroup::new("Finale")];
    record.show.psa_sequences = vec![PsaSequence {
        name: "Song".into(),
        order: Some(1),
        last_played: Some(at),
    }];
    record.show.requests = vec![Request {
        sequence: song.clone(),
        position: 4,
        owner_requested: false,
        viewer_requested: None,
    }];
    record.show.votes = vec![
        Vote::for_sequence(song, 3, at),
        Vote::for_group(SequenceGroup::new("Finale"), 2, at),
    ];
    record.show.stats.record_win("Song", at);
    record.show.playing_now = "Song".into();
    record.show.last_fpp_heartbeat = Some(at);

    let outcome = ShowRepo::save(&pool, &record).await.unwrap();
    assert_eq!(outcome, SaveOutcome::Saved { version: 1 });

    let found = ShowRepo::find_by_token(&pool, "full").await.unwrap().unwrap();
    assert_eq!(found.version, 1);
    assert_eq!(found.show, record.show);
}

// ---------------------------------------------------------------------------
// Test: optimistic concurrency
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stale_save_conflicts(pool: PgPool) {
    let record = ShowRepo::create(&pool, &new_show("race")).await.unwrap();
    let mut first = record.clone();
    let mut second = record;

    first.show.playing_now = "First".into();
    assert_eq!(
        ShowRepo::save(&pool, &first).await.unwrap(),
        SaveOutcome::Saved { version: 1 }
    );

    second.show.playing_now = "Second".into();
    assert_eq!(
        ShowRepo::save(&pool, &second).await.unwrap(),
        SaveOutcome::Conflict
    );

    let found = ShowRepo::find_by_token(&pool, "race").await.unwrap().unwrap();
    assert_eq!(found.show.playing_now, "First");
}
