pub mod show_repo;

pub use show_repo::{SaveOutcome, ShowRepo};
