//! Load, apply, save cycle for show aggregates.
//!
//! Every plugin request works on the whole show: it is loaded by token, a core
//! operation runs against it in memory, and the result is written back with an
//! optimistic version check. A version conflict reloads and re-applies the
//! operation, up to `save_retry_limit` attempts.

use showplay_core::clock::Clock;
use showplay_core::error::CoreError;
use showplay_core::show::Show;
use showplay_db::models::show::ShowRecord;
use showplay_db::repositories::{SaveOutcome, ShowRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// Load a show by token or fail with 404.
pub async fn load_show(state: &AppState, show_token: &str) -> AppResult<ShowRecord> {
    ShowRepo::find_by_token(&state.pool, show_token)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Show",
                key: show_token.to_string(),
            }
            .into()
        })
}

/// Run a read-only operation against the current show.
pub async fn read_show<T, F>(state: &AppState, show_token: &str, op: F) -> AppResult<T>
where
    F: FnOnce(&Show) -> Result<T, CoreError>,
{
    let record = load_show(state, show_token).await?;
    Ok(op(&record.show)?)
}

/// Apply a mutating operation and persist the result.
///
/// If `op` fails nothing is written. If `op` leaves the show unchanged the
/// save is skipped. The closure may run more than once when a concurrent
/// writer wins the race, so it must not have side effects outside the show.
pub async fn mutate_show<T, F>(state: &AppState, show_token: &str, mut op: F) -> AppResult<T>
where
    F: FnMut(&mut Show, &dyn Clock) -> Result<T, CoreError> + Send,
    T: Send,
{
    let attempts = state.config.save_retry_limit.max(1);

    for attempt in 1..=attempts {
        let mut record = load_show(state, show_token).await?;
        let before = record.show.clone();
        let result = op(&mut record.show, state.clock.as_ref())?;

        if record.show == before {
            return Ok(result);
        }

        match ShowRepo::save(&state.pool, &record).await? {
            SaveOutcome::Saved { version } => {
                tracing::debug!(show_token, version, attempt, "Show saved");
                return Ok(result);
            }
            SaveOutcome::Conflict => {
                tracing::debug!(show_token, attempt, "Concurrent update, retrying");
            }
        }
    }

    tracing::warn!(show_token, attempts, "Giving up after repeated save conflicts");
    Err(CoreError::Conflict(format!("Show {show_token} was modified concurrently")).into())
}
