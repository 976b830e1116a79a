//! Plain-text rendering of command results

use crate::history::RecordedMatch;
use crate::types::{Competition, RankingEntry, RatingChange};
use crate::utils::display_rating;
use std::fmt::Write;

fn format_change(change: &RatingChange) -> String {
    let new_rating = display_rating(change.new_rating);
    let delta = new_rating - display_rating(change.old_rating);
    format!("{} {} ({:+})", change.player_id, new_rating, delta)
}

/// Two lines, winner first: `alice 1016 (+16)`
pub fn format_recorded_match(recorded: &RecordedMatch) -> String {
    format!(
        "{}\n{}\n",
        format_change(&recorded.winner),
        format_change(&recorded.loser)
    )
}

/// Ranking table with a padded name column and rounded ratings
pub fn format_ranking(ranking: &[RankingEntry]) -> String {
    if ranking.is_empty() {
        return "No matches recorded\n".to_string();
    }

    let width = ranking
        .iter()
        .map(|entry| entry.player_id.as_str().chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for entry in ranking {
        let _ = writeln!(
            out,
            "{:<width$} {:>4}",
            entry.player_id.as_str(),
            display_rating(entry.rating),
            width = width
        );
    }
    out
}

/// Competition names, the current one marked with `*`
pub fn format_competitions(competitions: &[Competition], current: Option<&Competition>) -> String {
    if competitions.is_empty() {
        return "No competitions yet\n".to_string();
    }

    let mut out = String::new();
    for competition in competitions {
        let marker = if Some(competition) == current { '*' } else { ' ' };
        let _ = writeln!(out, "{} {}", marker, competition);
    }
    out
}
