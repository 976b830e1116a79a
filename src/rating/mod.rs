//! Rating engine using the Elo algorithm
//!
//! This module provides the pairwise calculator interface, the Elo
//! implementation backed by the skillratings crate, and the replay
//! functions that turn a match log into ratings.

pub mod calculator;
pub mod elo;
pub mod replay;

// Re-export commonly used types
pub use calculator::RatingCalculator;
pub use elo::{EloRatingCalculator, EloSettings, K_FACTOR};
pub use replay::{participants, replay, trajectory, PlayerTrajectory};
