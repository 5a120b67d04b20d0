//! Playback-selection engine for a single show.
//!
//! Everything in this crate is synchronous and operates on one in-memory
//! [`show::Show`] aggregate. Loading and persisting the aggregate is the
//! caller's job (see the `showplay-db` crate).

pub mod catalog;
pub mod clock;
pub mod error;
pub mod playback;
pub mod psa;
pub mod request_queue;
pub mod show;
pub mod types;
pub mod visibility;
pub mod vote_tally;
