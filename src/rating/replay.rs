//! Replay of a match log into ratings
//!
//! Ratings are never stored. Everything here is a pure function of the
//! event slice it is given, so any prefix of a log can be replayed to
//! reproduce the ratings at that point in time.

use crate::rating::calculator::RatingCalculator;
use crate::types::{MatchEvent, PlayerId, Rating};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Rating history of one player, one entry per log position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTrajectory {
    pub player_id: PlayerId,
    /// Initial rating followed by the rating after each event
    pub ratings: Vec<Rating>,
}

impl PlayerTrajectory {
    /// Rating after the last event
    pub fn current(&self) -> Option<Rating> {
        self.ratings.last().copied()
    }
}

/// Distinct players in order of first appearance (winner before loser)
pub fn participants(events: &[MatchEvent]) -> Vec<PlayerId> {
    let mut seen = HashSet::new();
    let mut players = Vec::new();

    for event in events {
        for player in [&event.winner, &event.loser] {
            if seen.insert(player) {
                players.push(player.clone());
            }
        }
    }

    players
}

/// Apply one event to a running rating table
fn apply_event<C: RatingCalculator + ?Sized>(
    calculator: &C,
    ratings: &mut HashMap<PlayerId, Rating>,
    event: &MatchEvent,
) {
    let initial = calculator.initial_rating();
    let winner = *ratings.entry(event.winner.clone()).or_insert(initial);
    let loser = *ratings.entry(event.loser.clone()).or_insert(initial);

    let (new_winner, new_loser) = calculator.pairwise_update(winner, loser);
    ratings.insert(event.winner.clone(), new_winner);
    ratings.insert(event.loser.clone(), new_loser);
}

/// Final rating of every player appearing in `events`
///
/// Players that never appear are absent from the result.
pub fn replay<C: RatingCalculator + ?Sized>(
    calculator: &C,
    events: &[MatchEvent],
) -> HashMap<PlayerId, Rating> {
    let mut ratings = HashMap::new();
    for event in events {
        apply_event(calculator, &mut ratings, event);
    }
    ratings
}

/// Rating series for each of `known_players` across the whole log
///
/// Every series has `1 + events.len()` entries. A player sits at the
/// initial rating until their first match and carries their rating
/// forward through events they did not take part in. Duplicate entries
/// in `known_players` are ignored.
pub fn trajectory<C: RatingCalculator + ?Sized>(
    calculator: &C,
    events: &[MatchEvent],
    known_players: &[PlayerId],
) -> Vec<PlayerTrajectory> {
    let initial = calculator.initial_rating();

    let mut seen = HashSet::new();
    let mut series: Vec<PlayerTrajectory> = known_players
        .iter()
        .filter(|player| seen.insert(*player))
        .map(|player| {
            let mut ratings = Vec::with_capacity(events.len() + 1);
            ratings.push(initial);
            PlayerTrajectory {
                player_id: player.clone(),
                ratings,
            }
        })
        .collect();

    // Unknown players still influence their opponents, so the full table is kept
    let mut current = HashMap::new();
    for event in events {
        apply_event(calculator, &mut current, event);

        for entry in series.iter_mut() {
            let rating = current.get(&entry.player_id).copied().unwrap_or(initial);
            entry.ratings.push(rating);
        }
    }

    series
}
