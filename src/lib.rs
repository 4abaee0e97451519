//! Puzzle Leaderboard - rankings for daily guessing-puzzle results
//!
//! This crate turns one score per player per puzzle day into a ranked
//! leaderboard, using pairwise Elo (sequential or MAP-fitted) or
//! day-adjusted, empirically shrunk average scores. It does no IO: callers
//! supply validated day groups and receive ranked entries.

pub mod config;
pub mod error;
pub mod leaderboard;
pub mod rating;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RankingError, Result};
pub use types::*;

// Re-export key components
pub use config::RankingConfig;
pub use leaderboard::{engine_for, rank, Leaderboard};
pub use rating::RatingEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
