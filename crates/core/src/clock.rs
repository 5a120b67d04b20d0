//! Injected time source.
//!
//! Vote tie-breaks, PSA rotation and same-day win counts all depend on
//! "now", so every operation takes a [`Clock`] instead of reading the
//! system time directly.

use chrono::{NaiveTime, TimeZone, Utc};

use crate::types::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Midnight (UTC) at the start of the current day.
    fn start_of_day(&self) -> Timestamp {
        let today = self.now().date_naive().and_time(NaiveTime::MIN);
        Utc.from_utc_datetime(&today)
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
