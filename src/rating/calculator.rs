//! Rating calculator trait
//!
//! This module defines the seam between the replay engine and the
//! concrete pairwise rating formula.

use crate::types::Rating;

/// Trait for computing one pairwise rating update
pub trait RatingCalculator: Send + Sync {
    /// Ratings after `winner` beats `loser`
    ///
    /// # Returns
    /// `(new_winner_rating, new_loser_rating)`
    fn pairwise_update(&self, winner: Rating, loser: Rating) -> (Rating, Rating);

    /// Probability that a player rated `rating` beats one rated `opponent`
    fn expected_score(&self, rating: Rating, opponent: Rating) -> f64;

    /// Get the initial rating for new players
    fn initial_rating(&self) -> Rating;
}
