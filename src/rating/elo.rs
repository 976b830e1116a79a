//! Elo rating system implementation
//!
//! This module provides the concrete rating calculator using the logistic
//! Elo model from the skillratings crate.

use crate::rating::calculator::RatingCalculator;
use crate::types::{Rating, INITIAL_RATING};
use serde::{Deserialize, Serialize};
use skillratings::elo::{elo, expected_score, EloConfig, EloRating};
use skillratings::Outcomes;

/// K-factor applied to every match
pub const K_FACTOR: f64 = 32.0;

/// Parameters of the Elo model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EloSettings {
    /// Maximum points transferable in a single match
    pub k_factor: f64,
    /// Rating assigned to a player on first appearance
    pub initial_rating: Rating,
}

impl Default for EloSettings {
    fn default() -> Self {
        Self {
            k_factor: K_FACTOR,
            initial_rating: INITIAL_RATING,
        }
    }
}

impl EloSettings {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(self.k_factor.is_finite() && self.k_factor > 0.0) {
            return Err(crate::error::EloError::ConfigurationError {
                message: "K-factor must be a positive number".to_string(),
            }
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(crate::error::EloError::ConfigurationError {
                message: "Initial rating must be finite".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Elo rating calculator implementation
#[derive(Debug, Clone)]
pub struct EloRatingCalculator {
    settings: EloSettings,
    config: EloConfig,
}

impl EloRatingCalculator {
    /// Create a new Elo rating calculator
    pub fn new(settings: EloSettings) -> crate::error::Result<Self> {
        settings.validate()?;

        let config = EloConfig {
            k: settings.k_factor,
        };
        Ok(Self { settings, config })
    }

    pub fn settings(&self) -> &EloSettings {
        &self.settings
    }
}

impl Default for EloRatingCalculator {
    fn default() -> Self {
        let settings = EloSettings::default();
        let config = EloConfig {
            k: settings.k_factor,
        };
        Self { settings, config }
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn pairwise_update(&self, winner: Rating, loser: Rating) -> (Rating, Rating) {
        let (new_winner, new_loser) = elo(
            &EloRating { rating: winner },
            &EloRating { rating: loser },
            &Outcomes::WIN,
            &self.config,
        );

        (new_winner.rating, new_loser.rating)
    }

    fn expected_score(&self, rating: Rating, opponent: Rating) -> f64 {
        let (expected, _) = expected_score(
            &EloRating { rating },
            &EloRating { rating: opponent },
        );
        expected
    }

    fn initial_rating(&self) -> Rating {
        self.settings.initial_rating
    }
}
