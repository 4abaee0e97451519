//! Error types for the ranking engine
//!
//! All failures are input validation failures. The engine either returns a
//! complete leaderboard or one of these errors, never a partial result.

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RankingError>;

/// Typed errors surfaced to callers of the ranking engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankingError {
    #[error("Invalid score {score} for player {player_id} on day {day_key} (expected 1..={max_score})")]
    InvalidScore {
        player_id: String,
        day_key: String,
        score: u8,
        max_score: u8,
    },

    #[error("Player {player_id} has more than one result on day {day_key}")]
    DuplicateResult { player_id: String, day_key: String },

    #[error("Day {day_key} appears in more than one day group")]
    DuplicateDay { day_key: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}
