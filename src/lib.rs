//! Elo Ladder - Elo ratings replayed from a flat match log
//!
//! This crate keeps an ordered log of pairwise match results per
//! competition and derives every rating from that log on demand, which
//! makes undo a plain truncation of the log.

pub mod chart;
pub mod config;
pub mod error;
pub mod history;
pub mod rating;
pub mod report;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{EloError, Result};
pub use types::*;

// Re-export key components
pub use history::{HistoryService, MatchLogStore, MatchOutcome};
pub use rating::{EloRatingCalculator, RatingCalculator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
