//! Error types for the rating ladder
//!
//! Domain failures are modelled with thiserror and carried through
//! anyhow so storage and I/O context can be attached on the way up.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ladder scenarios
#[derive(Debug, thiserror::Error)]
pub enum EloError {
    #[error("No competition selected; run `elo start <competition>` first")]
    NoCompetitionSelected,

    #[error("Competition not found: {name}")]
    UnknownCompetition { name: String },

    #[error("Invalid competition name '{name}': {reason}")]
    InvalidCompetitionName { name: String, reason: String },

    #[error("Invalid player name '{name}': {reason}")]
    InvalidPlayerName { name: String, reason: String },

    #[error("A player cannot play against themselves: {player}")]
    SelfMatch { player: String },

    #[error("Malformed entry in {competition} log at line {line}: {reason}")]
    MalformedLogEntry {
        competition: String,
        line: usize,
        reason: String,
    },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}
