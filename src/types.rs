//! Common types used throughout the rating ladder

use crate::error::EloError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rating value for a player
pub type Rating = f64;

/// Rating every player starts from on first appearance
pub const INITIAL_RATING: Rating = 1000.0;

/// Separator between fields of a stored match event
pub const FIELD_SEPARATOR: char = ',';

/// Format used for match dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Case-normalized player identifier
///
/// Two raw names that differ only in case (or surrounding whitespace)
/// produce the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    /// Normalize a raw name into a player identifier
    pub fn new(raw: &str) -> Result<Self, EloError> {
        let name = raw.trim().to_lowercase();

        if name.is_empty() {
            return Err(EloError::InvalidPlayerName {
                name: raw.to_string(),
                reason: "name cannot be empty".to_string(),
            });
        }

        if name.contains(FIELD_SEPARATOR) || name.contains(['\n', '\r']) {
            return Err(EloError::InvalidPlayerName {
                name: raw.to_string(),
                reason: format!("name cannot contain '{}' or line breaks", FIELD_SEPARATOR),
            });
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PlayerId {
    type Error = EloError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

/// Validated competition name, usable as a file stem
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Competition(String);

impl Competition {
    pub fn new(raw: &str) -> Result<Self, EloError> {
        let name = raw.trim();

        if name.is_empty() {
            return Err(EloError::InvalidCompetitionName {
                name: raw.to_string(),
                reason: "name cannot be empty".to_string(),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(EloError::InvalidCompetitionName {
                name: raw.to_string(),
                reason: "only ASCII letters, digits, '-' and '_' are allowed".to_string(),
            });
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Competition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Competition {
    type Error = EloError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Competition> for String {
    fn from(competition: Competition) -> Self {
        competition.0
    }
}

/// A single recorded match: `winner` beat `loser` on `date`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub date: NaiveDate,
}

impl MatchEvent {
    pub fn new(winner: PlayerId, loser: PlayerId, date: NaiveDate) -> Self {
        Self {
            winner,
            loser,
            date,
        }
    }

    /// Render the event as one log line (without the trailing newline)
    pub fn to_line(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.winner,
            self.loser,
            self.date.format(DATE_FORMAT),
            sep = FIELD_SEPARATOR
        )
    }

    /// Parse one log line; the error string describes what was wrong
    pub fn parse_line(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() != 3 {
            return Err(format!("expected 3 fields, found {}", fields.len()));
        }

        let winner = PlayerId::new(fields[0]).map_err(|e| e.to_string())?;
        let loser = PlayerId::new(fields[1]).map_err(|e| e.to_string())?;
        if winner == loser {
            return Err(format!("{} is listed as both winner and loser", winner));
        }
        let date = NaiveDate::parse_from_str(fields[2].trim(), DATE_FORMAT)
            .map_err(|e| format!("invalid date '{}': {}", fields[2].trim(), e))?;

        Ok(Self::new(winner, loser, date))
    }
}

impl fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} beat {} on {}",
            self.winner,
            self.loser,
            self.date.format(DATE_FORMAT)
        )
    }
}

/// Rating change for one side of a recorded match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub old_rating: Rating,
    pub new_rating: Rating,
}

impl RatingChange {
    pub fn delta(&self) -> Rating {
        self.new_rating - self.old_rating
    }
}

/// One row of a competition ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub player_id: PlayerId,
    pub rating: Rating,
}
