//! Configuration management for puzzle-leaderboard
//!
//! Ranking options consumed by the engine, plus the tool-level settings the
//! command line binary loads from TOML files and environment variables.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, OutputFormat, ServiceSettings};
pub use rating::{RankingConfig, FAILED_SCORE, MAX_GUESSES};
