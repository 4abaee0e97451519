//! Day-adjusted, empirically shrunk average scores
//!
//! Each day's mean is compared to the grand average to estimate how hard that
//! puzzle was, scores are corrected by that day effect, and per-player
//! averages are pulled toward the population mean in proportion to how noisy
//! they are. Lower final scores are better.

use crate::rating::engine::RatingEngine;
use crate::rating::games::GameSet;
use crate::types::RankOrder;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Floor on the between-player variance used for shrinkage
pub const MIN_BETWEEN_VARIANCE: f64 = 0.01;

/// Per-player aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAverage {
    pub games_played: u32,
    pub raw_average: f64,
    pub adjusted_average: f64,
    /// Sample variance of adjusted scores (n - 1 denominator), None for one game
    pub adjusted_variance: Option<f64>,
    pub adjusted_std_dev: Option<f64>,
    pub standard_error: Option<f64>,
    /// Weight on the player's own average, None when no shrinkage applied
    pub shrinkage: Option<f64>,
    pub final_score: f64,
}

/// Population quantities used for empirical-Bayes shrinkage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    /// Shrinkage target: the raw grand average
    pub mean: f64,
    /// Games-weighted mean of reliable players' adjusted averages
    pub weighted_mean: f64,
    /// Games-weighted variance of those averages around `mean`
    pub weighted_variance: f64,
    /// Games-weighted mean of each reliable player's `variance / n`
    pub average_sampling_variance: f64,
    /// Estimated true between-player variance (tau squared), floored
    pub between_variance: f64,
    pub reliable_players: usize,
}

/// Full output of the average method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageReport {
    pub grand_average: f64,
    /// Day mean minus grand average, by day index (all zero when disabled)
    pub day_effects: Vec<f64>,
    /// By player index
    pub players: Vec<PlayerAverage>,
    /// Present only when shrinkage was applied
    pub population: Option<PopulationStats>,
}

/// Average-score engine
#[derive(Debug, Clone)]
pub struct AverageScore {
    day_adjustment: bool,
    bayes_adjustment: bool,
}

impl AverageScore {
    pub fn new(day_adjustment: bool, bayes_adjustment: bool) -> Self {
        Self {
            day_adjustment,
            bayes_adjustment,
        }
    }

    pub fn report(&self, games: &GameSet) -> AverageReport {
        let result_count = games.result_count();
        let grand_average = if result_count == 0 {
            0.0
        } else {
            let total: f64 = games
                .days()
                .iter()
                .flat_map(|d| d.results.iter())
                .map(|&(_, score)| f64::from(score))
                .sum();
            total / result_count as f64
        };

        let day_effects: Vec<f64> = games
            .days()
            .iter()
            .map(|day| {
                if !self.day_adjustment {
                    return 0.0;
                }
                let day_total: f64 = day.results.iter().map(|&(_, s)| f64::from(s)).sum();
                day_total / day.results.len() as f64 - grand_average
            })
            .collect();

        let player_count = games.player_count();
        let mut raw_scores: Vec<Vec<f64>> = vec![Vec::new(); player_count];
        let mut adjusted_scores: Vec<Vec<f64>> = vec![Vec::new(); player_count];
        for (day, effect) in games.days().iter().zip(&day_effects) {
            for &(idx, score) in &day.results {
                raw_scores[idx].push(f64::from(score));
                adjusted_scores[idx].push(f64::from(score) - effect);
            }
        }

        let mut players: Vec<PlayerAverage> = raw_scores
            .iter()
            .zip(&adjusted_scores)
            .map(|(raw, adjusted)| summarize(raw, adjusted))
            .collect();

        let population = if self.bayes_adjustment {
            population_stats(&players, grand_average)
        } else {
            None
        };

        if let Some(stats) = &population {
            for player in &mut players {
                match player.adjusted_variance {
                    Some(variance) => {
                        let sampling = variance / f64::from(player.games_played);
                        let shrinkage =
                            stats.between_variance / (stats.between_variance + sampling);
                        player.shrinkage = Some(shrinkage);
                        player.final_score = shrinkage * player.adjusted_average
                            + (1.0 - shrinkage) * stats.mean;
                    }
                    None => {
                        player.shrinkage = Some(0.0);
                        player.final_score = stats.mean;
                    }
                }
            }
        }

        debug!(
            "Average scores for {} players over {} days (grand average {:.3}, shrinkage {})",
            player_count,
            games.days().len(),
            grand_average,
            population.is_some()
        );

        AverageReport {
            grand_average,
            day_effects,
            players,
            population,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn summarize(raw: &[f64], adjusted: &[f64]) -> PlayerAverage {
    let n = adjusted.len();
    let adjusted_average = mean(adjusted);

    let adjusted_variance = (n > 1).then(|| {
        adjusted
            .iter()
            .map(|x| (x - adjusted_average).powi(2))
            .sum::<f64>()
            / (n - 1) as f64
    });
    let adjusted_std_dev = adjusted_variance.map(f64::sqrt);
    let standard_error = adjusted_std_dev.map(|sd| sd / (n as f64).sqrt());

    PlayerAverage {
        games_played: n as u32,
        raw_average: mean(raw),
        adjusted_average,
        adjusted_variance,
        adjusted_std_dev,
        standard_error,
        shrinkage: None,
        final_score: adjusted_average,
    }
}

/// Estimate shrinkage parameters from players with at least two games.
///
/// Returns None when no player qualifies.
fn population_stats(players: &[PlayerAverage], population_mean: f64) -> Option<PopulationStats> {
    let reliable: Vec<(f64, f64, f64)> = players
        .iter()
        .filter_map(|p| {
            p.adjusted_variance
                .map(|variance| (f64::from(p.games_played), p.adjusted_average, variance))
        })
        .collect();
    if reliable.is_empty() {
        return None;
    }

    let total_weight: f64 = reliable.iter().map(|&(n, _, _)| n).sum();
    let weighted_mean = reliable.iter().map(|&(n, avg, _)| n * avg).sum::<f64>() / total_weight;
    let weighted_variance = reliable
        .iter()
        .map(|&(n, avg, _)| n * (avg - population_mean).powi(2))
        .sum::<f64>()
        / total_weight;
    let average_sampling_variance = reliable
        .iter()
        .map(|&(n, _, variance)| n * (variance / n))
        .sum::<f64>()
        / total_weight;
    let between_variance =
        (weighted_variance - average_sampling_variance).max(MIN_BETWEEN_VARIANCE);

    Some(PopulationStats {
        mean: population_mean,
        weighted_mean,
        weighted_variance,
        average_sampling_variance,
        between_variance,
        reliable_players: reliable.len(),
    })
}

impl RatingEngine for AverageScore {
    fn name(&self) -> &'static str {
        "average"
    }

    fn rank_order(&self) -> RankOrder {
        RankOrder::LowerIsBetter
    }

    fn ratings(&self, games: &GameSet) -> Vec<f64> {
        self.report(games)
            .players
            .into_iter()
            .map(|p| p.final_score)
            .collect()
    }
}
