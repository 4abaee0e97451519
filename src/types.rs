//! Common types used throughout the ranking engine

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier for a player, as resolved by the caller
pub type PlayerId = String;

/// Identifier for one puzzle instance ("day")
pub type DayKey = String;

/// Which family of statistics ranks the players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsMethod {
    Elo,
    Average,
}

impl std::fmt::Display for StatsMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsMethod::Elo => write!(f, "elo"),
            StatsMethod::Average => write!(f, "average"),
        }
    }
}

impl FromStr for StatsMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "elo" => Ok(StatsMethod::Elo),
            "average" | "avg" => Ok(StatsMethod::Average),
            other => Err(format!("unknown stats method: {}", other)),
        }
    }
}

/// How Elo ratings are estimated when `StatsMethod::Elo` is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EloMethod {
    /// Sequential day-by-day pairwise updates
    Iterated,
    /// Joint maximum a posteriori fit over the whole outcome matrix
    Map,
}

impl std::fmt::Display for EloMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EloMethod::Iterated => write!(f, "iterated"),
            EloMethod::Map => write!(f, "map"),
        }
    }
}

impl FromStr for EloMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iterated" => Ok(EloMethod::Iterated),
            "map" => Ok(EloMethod::Map),
            other => Err(format!("unknown elo method: {}", other)),
        }
    }
}

/// Direction in which ratings are ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankOrder {
    HigherIsBetter,
    LowerIsBetter,
}

/// A single player's score on a single day, in flat row form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub player_id: PlayerId,
    pub day_key: DayKey,
    /// 1-6 guesses, or 7 for a failed attempt when failures are counted
    pub raw_score: u8,
}

/// A player's score inside a day group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    #[serde(rename = "player")]
    pub player_id: PlayerId,
    pub score: u8,
}

impl PlayerScore {
    pub fn new(player_id: impl Into<PlayerId>, score: u8) -> Self {
        Self {
            player_id: player_id.into(),
            score,
        }
    }
}

/// All results for one puzzle instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayGroup {
    #[serde(rename = "day")]
    pub day_key: DayKey,
    pub results: Vec<PlayerScore>,
}

impl DayGroup {
    pub fn new(day_key: impl Into<DayKey>, results: Vec<PlayerScore>) -> Self {
        Self {
            day_key: day_key.into(),
            results,
        }
    }

    /// Group flat rows by day, keeping days in order of first appearance
    pub fn from_results(results: impl IntoIterator<Item = GameResult>) -> Vec<DayGroup> {
        let mut groups: Vec<DayGroup> = Vec::new();
        let mut positions: std::collections::HashMap<DayKey, usize> =
            std::collections::HashMap::new();

        for result in results {
            let position = *positions.entry(result.day_key.clone()).or_insert_with(|| {
                groups.push(DayGroup::new(result.day_key.clone(), Vec::new()));
                groups.len() - 1
            });
            groups[position]
                .results
                .push(PlayerScore::new(result.player_id, result.raw_score));
        }

        groups
    }
}

/// One ranked row of the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub games_played: u32,
    /// Elo rating (higher is better) or final average score (lower is better)
    pub rating: f64,
}
