//! History service
//!
//! Every operation loads the competition's log, replays it through the
//! rating engine and, for mutations, saves the log exactly once. No rating
//! is kept between calls.

use crate::error::EloError;
use crate::history::confirm::Confirmation;
use crate::history::store::MatchLogStore;
use crate::rating::{participants, replay, trajectory, PlayerTrajectory, RatingCalculator};
use crate::types::{Competition, MatchEvent, PlayerId, RankingEntry, RatingChange};
use crate::utils::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// A match that was appended to the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedMatch {
    pub event: MatchEvent,
    pub winner: RatingChange,
    pub loser: RatingChange,
    /// Winner's win probability before the match
    pub winner_expected_score: f64,
}

/// Result of asking to record a match
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Recorded(RecordedMatch),
    /// Creation of a new player was declined; the log is unchanged
    Declined { player: PlayerId },
}

/// Orchestrates the rating engine against stored match logs
pub struct HistoryService {
    store: Arc<dyn MatchLogStore>,
    calculator: Arc<dyn RatingCalculator>,
    clock: Arc<dyn Clock>,
}

impl HistoryService {
    pub fn new(
        store: Arc<dyn MatchLogStore>,
        calculator: Arc<dyn RatingCalculator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            calculator,
            clock,
        }
    }

    /// Record that `raw_winner` beat `raw_loser` today
    ///
    /// Each name not yet in the log is passed to `confirmation` first; a
    /// single refusal leaves the log untouched.
    pub fn record_match(
        &self,
        competition: &Competition,
        raw_winner: &str,
        raw_loser: &str,
        confirmation: &dyn Confirmation,
    ) -> crate::error::Result<MatchOutcome> {
        let winner = PlayerId::new(raw_winner)?;
        let loser = PlayerId::new(raw_loser)?;

        if winner == loser {
            return Err(EloError::SelfMatch {
                player: winner.to_string(),
            }
            .into());
        }

        let mut log = self.store.load(competition)?;

        let known: HashSet<PlayerId> = participants(&log).into_iter().collect();
        for player in [&winner, &loser] {
            if known.contains(player) {
                continue;
            }

            if !confirmation.confirm(player)? {
                info!(
                    "Creation of player '{}' declined, match not recorded in {}",
                    player, competition
                );
                return Ok(MatchOutcome::Declined {
                    player: player.clone(),
                });
            }
            info!("Creating player '{}' in {}", player, competition);
        }

        let ratings = replay(self.calculator.as_ref(), &log);
        let initial = self.calculator.initial_rating();
        let old_winner = ratings.get(&winner).copied().unwrap_or(initial);
        let old_loser = ratings.get(&loser).copied().unwrap_or(initial);

        let winner_expected_score = self.calculator.expected_score(old_winner, old_loser);
        let (new_winner, new_loser) = self.calculator.pairwise_update(old_winner, old_loser);

        let event = MatchEvent::new(winner.clone(), loser.clone(), self.clock.today());
        log.push(event.clone());
        self.store.save(competition, &log)?;

        info!(
            "Recorded match in {}: {} ({:.1} -> {:.1}) beat {} ({:.1} -> {:.1})",
            competition, winner, old_winner, new_winner, loser, old_loser, new_loser
        );

        Ok(MatchOutcome::Recorded(RecordedMatch {
            event,
            winner: RatingChange {
                player_id: winner,
                old_rating: old_winner,
                new_rating: new_winner,
            },
            loser: RatingChange {
                player_id: loser,
                old_rating: old_loser,
                new_rating: new_loser,
            },
            winner_expected_score,
        }))
    }

    /// Drop the most recent match, returning it; an empty log is left alone
    pub fn undo_last(&self, competition: &Competition) -> crate::error::Result<Option<MatchEvent>> {
        let mut log = self.store.load(competition)?;

        let Some(removed) = log.pop() else {
            debug!("Nothing to undo in {}", competition);
            return Ok(None);
        };

        self.store.save(competition, &log)?;
        info!("Removed last match from {}: {}", competition, removed);
        Ok(Some(removed))
    }

    /// Players ordered by current rating, highest first
    ///
    /// Equal ratings keep the order in which the players first appear in
    /// the log.
    pub fn rank(&self, competition: &Competition) -> crate::error::Result<Vec<RankingEntry>> {
        let log = self.store.load(competition)?;
        let ratings = replay(self.calculator.as_ref(), &log);

        let mut ranking: Vec<RankingEntry> = participants(&log)
            .into_iter()
            .filter_map(|player_id| {
                ratings.get(&player_id).map(|&rating| RankingEntry { player_id, rating })
            })
            .collect();

        // sort_by is stable, so ties stay in first-appearance order
        ranking.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!("Ranked {} players in {}", ranking.len(), competition);
        Ok(ranking)
    }

    /// Rating series of every participant, each `1 + log length` long
    pub fn series_for_chart(
        &self,
        competition: &Competition,
    ) -> crate::error::Result<Vec<PlayerTrajectory>> {
        let log = self.store.load(competition)?;
        let players = participants(&log);
        Ok(trajectory(self.calculator.as_ref(), &log, &players))
    }

    /// Create an empty log for `competition`; false if it already existed
    pub fn create_competition(&self, competition: &Competition) -> crate::error::Result<bool> {
        if self.store.exists(competition)? {
            return Ok(false);
        }

        self.store.save(competition, &[])?;
        info!("Created competition {}", competition);
        Ok(true)
    }

    /// Fail with `UnknownCompetition` unless a log exists
    pub fn ensure_competition(&self, competition: &Competition) -> crate::error::Result<()> {
        if self.store.exists(competition)? {
            Ok(())
        } else {
            Err(EloError::UnknownCompetition {
                name: competition.to_string(),
            }
            .into())
        }
    }

    /// All competitions with a stored log
    pub fn competitions(&self) -> crate::error::Result<Vec<Competition>> {
        self.store.list_competitions()
    }
}
