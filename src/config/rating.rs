//! Ranking engine configuration
//!
//! The flat set of options that selects an engine and tunes it. Every
//! invocation of the engine receives one of these by reference.

use crate::error::{RankingError, Result};
use crate::types::{EloMethod, StatsMethod};
use serde::{Deserialize, Serialize};
use std::env;

/// Score of a solve in the worst allowed number of guesses
pub const MAX_GUESSES: u8 = 6;

/// Score recorded for a failed attempt when failures are counted
pub const FAILED_SCORE: u8 = 7;

/// Ranking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Count failed attempts as a score of 7 instead of excluding them
    pub x_is_seven: bool,
    /// Minimum number of games a player needs to be ranked
    pub game_cutoff: u32,
    pub stats_method: StatsMethod,
    /// Only used when `stats_method` is Elo
    pub elo_method: EloMethod,
    /// K-factor for iterated Elo updates
    pub elo_k: f64,
    /// Normalise scores by per-day difficulty (Average only)
    pub day_adjustment: bool,
    /// Empirical-Bayes shrinkage toward the population mean (Average only)
    pub bayes_adjustment: bool,
    /// Convergence tolerance for the MAP Elo fit
    pub map_tolerance: f64,
    /// Iteration cap for the MAP Elo fit
    pub map_max_iterations: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            x_is_seven: false,
            game_cutoff: 1,
            stats_method: StatsMethod::Elo,
            elo_method: EloMethod::Map,
            elo_k: 2.0,
            day_adjustment: true,
            bayes_adjustment: true,
            map_tolerance: 1e-6,
            map_max_iterations: 200,
        }
    }
}

impl RankingConfig {
    /// Worst score the engine will accept: 7 when failures count, else 6
    pub fn max_score(&self) -> u8 {
        if self.x_is_seven {
            FAILED_SCORE
        } else {
            MAX_GUESSES
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.game_cutoff < 1 {
            return Err(RankingError::ConfigurationError {
                message: "Game cutoff must be at least 1".to_string(),
            });
        }

        if !self.elo_k.is_finite() || self.elo_k <= 0.0 {
            return Err(RankingError::ConfigurationError {
                message: format!("Elo K-factor must be positive, got {}", self.elo_k),
            });
        }

        if !self.map_tolerance.is_finite() || self.map_tolerance <= 0.0 {
            return Err(RankingError::ConfigurationError {
                message: format!("MAP tolerance must be positive, got {}", self.map_tolerance),
            });
        }

        if self.map_max_iterations == 0 {
            return Err(RankingError::ConfigurationError {
                message: "MAP iteration cap must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Overlay environment variables on top of this configuration
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Some(x_is_seven) = env_var("X_IS_SEVEN") {
            self.x_is_seven = parse_var("X_IS_SEVEN", &x_is_seven)?;
        }
        if let Some(cutoff) = env_var("GAME_CUTOFF") {
            self.game_cutoff = parse_var("GAME_CUTOFF", &cutoff)?;
        }
        if let Some(method) = env_var("STATS_METHOD") {
            self.stats_method = parse_var("STATS_METHOD", &method)?;
        }
        if let Some(method) = env_var("ELO_METHOD") {
            self.elo_method = parse_var("ELO_METHOD", &method)?;
        }
        if let Some(k) = env_var("ELO_K") {
            self.elo_k = parse_var("ELO_K", &k)?;
        }
        if let Some(day) = env_var("DAY_ADJUSTMENT") {
            self.day_adjustment = parse_var("DAY_ADJUSTMENT", &day)?;
        }
        if let Some(bayes) = env_var("BAYES_ADJUSTMENT") {
            self.bayes_adjustment = parse_var("BAYES_ADJUSTMENT", &bayes)?;
        }
        Ok(())
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok()
}

pub(crate) fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> anyhow::Result<T> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid {} value: {}", name, value))
}
