//! Leaderboard assembly
//!
//! Picks the rating engine named by the configuration, rates every player,
//! drops players below the game cutoff, and sorts the rest. Ties keep
//! ascending player ID order.

use crate::config::RankingConfig;
use crate::error::Result;
use crate::rating::{AverageScore, GameSet, IteratedElo, MapElo, RatingEngine};
use crate::types::{DayGroup, EloMethod, LeaderboardEntry, RankOrder, StatsMethod};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Build the rating engine selected by `config`
pub fn engine_for(config: &RankingConfig) -> Box<dyn RatingEngine> {
    match (config.stats_method, config.elo_method) {
        (StatsMethod::Average, _) => Box::new(AverageScore::new(
            config.day_adjustment,
            config.bayes_adjustment,
        )),
        (StatsMethod::Elo, EloMethod::Iterated) => Box::new(IteratedElo::new(config.elo_k)),
        (StatsMethod::Elo, EloMethod::Map) => Box::new(MapElo::new(
            config.map_tolerance,
            config.map_max_iterations,
        )),
    }
}

/// A ranked leaderboard and how it was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    /// Engine name, e.g. "elo-map"
    pub method: String,
    pub rank_order: RankOrder,
    /// Players seen before the game cutoff was applied
    pub total_players: usize,
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Validate the configuration and games, then rank
    pub fn build(config: &RankingConfig, days: &[DayGroup]) -> Result<Self> {
        config.validate()?;
        let games = GameSet::new(days, config.max_score())?;
        let engine = engine_for(config);
        Ok(Self::from_engine(engine.as_ref(), &games, config.game_cutoff))
    }

    /// Rank an already indexed game set with a specific engine
    pub fn from_engine(engine: &dyn RatingEngine, games: &GameSet, game_cutoff: u32) -> Self {
        let ratings = engine.ratings(games);
        let rank_order = engine.rank_order();

        let mut entries: Vec<LeaderboardEntry> = games
            .players()
            .ids()
            .iter()
            .zip(games.games_played())
            .zip(ratings)
            .filter(|((_, &games_played), _)| games_played >= game_cutoff)
            .map(|((player_id, &games_played), rating)| LeaderboardEntry {
                player_id: player_id.clone(),
                games_played,
                rating,
            })
            .collect();

        entries.sort_by(|a, b| compare_ratings(a.rating, b.rating, rank_order));

        debug!(
            "{} of {} players meet the {} game cutoff",
            entries.len(),
            games.player_count(),
            game_cutoff
        );
        info!(
            "Built {} leaderboard with {} entries",
            engine.name(),
            entries.len()
        );

        Self {
            method: engine.name().to_string(),
            rank_order,
            total_players: games.player_count(),
            entries,
        }
    }
}

fn compare_ratings(a: f64, b: f64, order: RankOrder) -> Ordering {
    match order {
        RankOrder::HigherIsBetter => b.total_cmp(&a),
        RankOrder::LowerIsBetter => a.total_cmp(&b),
    }
}

/// Rank players per `config`, returning just the ordered entries
pub fn rank(config: &RankingConfig, days: &[DayGroup]) -> Result<Vec<LeaderboardEntry>> {
    Leaderboard::build(config, days).map(|board| board.entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RankingError;
    use crate::types::PlayerScore;

    fn day(key: &str, results: &[(&str, u8)]) -> DayGroup {
        DayGroup::new(
            key,
            results
                .iter()
                .map(|&(id, score)| PlayerScore::new(id, score))
                .collect(),
        )
    }

    fn average_config(cutoff: u32) -> RankingConfig {
        RankingConfig {
            stats_method: StatsMethod::Average,
            day_adjustment: false,
            bayes_adjustment: false,
            game_cutoff: cutoff,
            ..RankingConfig::default()
        }
    }

    #[test]
    fn test_engine_selection() {
        let mut config = RankingConfig::default();
        assert_eq!(engine_for(&config).name(), "elo-map");

        config.elo_method = EloMethod::Iterated;
        assert_eq!(engine_for(&config).name(), "elo-iterated");

        config.stats_method = StatsMethod::Average;
        let engine = engine_for(&config);
        assert_eq!(engine.name(), "average");
        assert_eq!(engine.rank_order(), RankOrder::LowerIsBetter);
    }

    #[test]
    fn test_average_ranked_ascending() {
        let days = vec![
            day("1", &[("carol", 6)]),
            day("2", &[("alice", 2)]),
            day("3", &[("bob", 4)]),
        ];
        let board = Leaderboard::build(&average_config(1), &days).unwrap();

        let order: Vec<(&str, f64)> = board
            .entries
            .iter()
            .map(|e| (e.player_id.as_str(), e.rating))
            .collect();
        assert_eq!(order, vec![("alice", 2.0), ("bob", 4.0), ("carol", 6.0)]);
        assert!(board.entries.iter().all(|e| e.games_played == 1));
        assert_eq!(board.total_players, 3);
    }

    #[test]
    fn test_cutoff_can_empty_the_board() {
        let days = vec![
            day("1", &[("alice", 2)]),
            day("2", &[("bob", 4)]),
            day("3", &[("carol", 6)]),
        ];
        let entries = rank(&average_config(2), &days).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_elo_ranked_descending() {
        let days = vec![
            day("1", &[("alice", 3), ("bob", 5)]),
            day("2", &[("alice", 2), ("bob", 4), ("carol", 6)]),
        ];
        let config = RankingConfig {
            elo_method: EloMethod::Iterated,
            ..RankingConfig::default()
        };
        let board = Leaderboard::build(&config, &days).unwrap();

        assert_eq!(board.rank_order, RankOrder::HigherIsBetter);
        assert_eq!(board.entries[0].player_id, "alice");
        assert_eq!(board.entries[0].games_played, 2);
        assert_eq!(board.entries[2].player_id, "carol");
        assert!(board.entries[0].rating > board.entries[1].rating);
    }

    #[test]
    fn test_ties_ordered_by_player_id() {
        let days = vec![day("1", &[("zed", 3), ("amy", 3), ("max", 3)])];
        let entries = rank(&average_config(1), &days).unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.player_id.as_str()).collect();
        assert_eq!(ids, vec!["amy", "max", "zed"]);
    }

    #[test]
    fn test_failures_need_x_is_seven() {
        let days = vec![day("1", &[("alice", 7), ("bob", 3)])];

        let result = rank(&RankingConfig::default(), &days);
        assert!(matches!(result, Err(RankingError::InvalidScore { .. })));

        let config = RankingConfig {
            x_is_seven: true,
            ..RankingConfig::default()
        };
        let entries = rank(&config, &days).unwrap();
        assert_eq!(entries[0].player_id, "bob");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RankingConfig {
            elo_k: 0.0,
            ..RankingConfig::default()
        };
        let result = rank(&config, &[day("1", &[("alice", 3)])]);
        assert!(matches!(
            result,
            Err(RankingError::ConfigurationError { .. })
        ));
    }
}
