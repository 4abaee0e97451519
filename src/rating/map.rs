//! Maximum a posteriori Elo via Bradley-Terry fixed-point iteration
//!
//! All pairwise outcomes are accumulated into one matrix and the ratings are
//! fitted jointly. The fit tracks Bradley-Terry strengths
//! `p_i = 10^((elo_i - 1000) / 400)` and applies Newman's update with a weak
//! prior worth one win and one loss against a strength-1 opponent:
//!
//! ```text
//! p_i <- (1/(p_i+1) + sum_j W[i][j] p_j / (p_i+p_j))
//!      / (1/(p_i+1) + sum_j W[j][i]     / (p_i+p_j))
//! ```
//!
//! Players are updated in place in index order, so later players in a sweep
//! see the strengths already updated earlier in that sweep.

use crate::rating::engine::RatingEngine;
use crate::rating::games::GameSet;
use crate::rating::iterated::expected_score;
use crate::rating::points::point;
use crate::rating::{ELO_SCALE, INITIAL_ELO};
use crate::types::RankOrder;
use tracing::{debug, trace, warn};

/// Default convergence tolerance on the summed strength change per sweep
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default cap on the number of sweeps
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

/// Accumulated pairwise points, `W[i][j]` summed over every shared day
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeMatrix {
    size: usize,
    wins: Vec<f64>,
}

impl OutcomeMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            wins: vec![0.0; size * size],
        }
    }

    /// Accumulate `point(score_i, score_j)` for every ordered pair on every day
    pub fn from_games(games: &GameSet) -> Self {
        let max_score = games.max_score();
        let mut matrix = Self::new(games.player_count());

        for day in games.days() {
            for ((i, score_i), (j, score_j)) in day.ordered_pairs() {
                matrix.add(i, j, point(score_i, score_j, max_score));
            }
        }

        matrix
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.wins[i * self.size + j]
    }

    pub fn add(&mut self, i: usize, j: usize, points: f64) {
        self.wins[i * self.size + j] += points;
    }

    /// Number of games between `i` and `j`; each shared day contributes
    /// exactly one point split between the two
    pub fn games_between(&self, i: usize, j: usize) -> f64 {
        self.get(i, j) + self.get(j, i)
    }

    /// Whether `i` has at least one recorded game against anyone
    pub fn has_games(&self, i: usize) -> bool {
        (0..self.size).any(|j| j != i && self.games_between(i, j) > 0.0)
    }

    /// Total number of pairwise games
    pub fn total_games(&self) -> f64 {
        let mut total = 0.0;
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                total += self.games_between(i, j);
            }
        }
        total
    }
}

/// Convert a Bradley-Terry strength to an Elo rating
pub fn strength_to_elo(strength: f64) -> f64 {
    INITIAL_ELO + ELO_SCALE * strength.log10()
}

/// Convert an Elo rating to a Bradley-Terry strength
pub fn elo_to_strength(elo: f64) -> f64 {
    10f64.powf((elo - INITIAL_ELO) / ELO_SCALE)
}

/// Geometric mean of strictly positive values, 1.0 for an empty slice
pub fn geometric_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 1.0;
    }
    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    (log_sum / values.len() as f64).exp()
}

/// Base-10 negative log-likelihood of the outcomes under `elo`, per game.
///
/// Zero when there are no pairwise games.
pub fn negative_log_likelihood(matrix: &OutcomeMatrix, elo: &[f64]) -> f64 {
    let total_games = matrix.total_games();
    if total_games <= 0.0 {
        return 0.0;
    }

    let mut nll = 0.0;
    for i in 0..matrix.len() {
        for j in 0..matrix.len() {
            let wins = matrix.get(i, j);
            if i == j || wins == 0.0 {
                continue;
            }
            nll -= wins * expected_score(elo[i], elo[j]).log10();
        }
    }

    nll / total_games
}

/// Result of a MAP Elo fit
#[derive(Debug, Clone)]
pub struct MapEloFit {
    /// Final Elo ratings, by player index
    pub elo: Vec<f64>,
    /// Final Bradley-Terry strengths, by player index
    pub strengths: Vec<f64>,
    /// Negative log-likelihood after each sweep
    pub nll_history: Vec<f64>,
    /// Number of sweeps performed
    pub iterations: usize,
    pub converged: bool,
}

/// MAP Elo engine
#[derive(Debug, Clone)]
pub struct MapElo {
    tolerance: f64,
    max_iterations: usize,
}

impl Default for MapElo {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE, DEFAULT_MAX_ITERATIONS)
    }
}

impl MapElo {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Fit strengths to the outcome matrix.
    ///
    /// Stops when the summed absolute strength change of a sweep drops below
    /// the tolerance, or after `max_iterations` sweeps.
    pub fn fit(&self, matrix: &OutcomeMatrix) -> MapEloFit {
        let size = matrix.len();
        let active: Vec<bool> = (0..size).map(|i| matrix.has_games(i)).collect();
        let mut strengths = vec![1.0; size];
        let mut nll_history = Vec::new();
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            let previous = strengths.clone();

            for i in 0..size {
                let prior = 1.0 / (strengths[i] + 1.0);
                let mut numerator = prior;
                let mut denominator = prior;

                for j in 0..size {
                    if j == i {
                        continue;
                    }
                    let combined = strengths[i] + strengths[j];
                    numerator += matrix.get(i, j) * strengths[j] / combined;
                    denominator += matrix.get(j, i) / combined;
                }

                strengths[i] = numerator / denominator;
            }

            normalize(&mut strengths, &active);
            iterations += 1;

            let elo: Vec<f64> = strengths.iter().map(|&p| strength_to_elo(p)).collect();
            let nll = negative_log_likelihood(matrix, &elo);
            nll_history.push(nll);

            let change: f64 = previous
                .iter()
                .zip(&strengths)
                .map(|(old, new)| (old - new).abs())
                .sum();
            trace!(iteration = iterations, change, nll, "MAP Elo sweep");

            if change < self.tolerance {
                converged = true;
                break;
            }
        }

        if converged {
            debug!("MAP Elo converged after {} iterations", iterations);
        } else {
            warn!(
                "MAP Elo stopped at the {} iteration cap without converging",
                self.max_iterations
            );
        }

        MapEloFit {
            elo: strengths.iter().map(|&p| strength_to_elo(p)).collect(),
            strengths,
            nll_history,
            iterations,
            converged,
        }
    }
}

/// Divide every player with recorded games by the geometric mean of their
/// strengths. Players without games stay at exactly 1, so the geometric mean
/// of the whole vector is 1 either way.
///
/// Rescaling the whole vector instead would drag isolated players off 1000
/// Elo. See "MAP normalization vs. isolated players" in DESIGN.md.
fn normalize(strengths: &mut [f64], active: &[bool]) {
    let active_strengths: Vec<f64> = strengths
        .iter()
        .zip(active)
        .filter(|(_, &is_active)| is_active)
        .map(|(&p, _)| p)
        .collect();
    if active_strengths.is_empty() {
        return;
    }

    let mean = geometric_mean(&active_strengths);
    for (p, _) in strengths
        .iter_mut()
        .zip(active)
        .filter(|(_, &is_active)| is_active)
    {
        *p /= mean;
    }
}

impl RatingEngine for MapElo {
    fn name(&self) -> &'static str {
        "elo-map"
    }

    fn rank_order(&self) -> RankOrder {
        RankOrder::HigherIsBetter
    }

    fn ratings(&self, games: &GameSet) -> Vec<f64> {
        self.fit(&OutcomeMatrix::from_games(games)).elo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DayGroup, PlayerScore};

    fn games(days: &[(&str, &[(&str, u8)])]) -> GameSet {
        let groups: Vec<DayGroup> = days
            .iter()
            .map(|(key, results)| {
                DayGroup::new(
                    *key,
                    results
                        .iter()
                        .map(|&(id, score)| PlayerScore::new(id, score))
                        .collect(),
                )
            })
            .collect();
        GameSet::new(&groups, 6).unwrap()
    }

    #[test]
    fn test_outcome_matrix_accumulates_points() {
        let games = games(&[
            ("1", &[("a", 3), ("b", 5)]),
            ("2", &[("a", 4), ("b", 4)]),
        ]);
        let matrix = OutcomeMatrix::from_games(&games);

        assert!((matrix.get(0, 1) - 1.2).abs() < 1e-12);
        assert!((matrix.get(1, 0) - 0.8).abs() < 1e-12);
        assert_eq!(matrix.get(0, 0), 0.0);
        assert!((matrix.games_between(0, 1) - 2.0).abs() < 1e-12);
        assert!((matrix.total_games() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_strength_conversion() {
        assert_eq!(strength_to_elo(1.0), 1000.0);
        assert!((strength_to_elo(10.0) - 1400.0).abs() < 1e-9);
        assert!((elo_to_strength(600.0) - 0.1).abs() < 1e-12);
        assert!((strength_to_elo(elo_to_strength(1234.5)) - 1234.5).abs() < 1e-9);
    }

    #[test]
    fn test_geometric_mean() {
        assert!((geometric_mean(&[2.0, 8.0]) - 4.0).abs() < 1e-12);
        assert_eq!(geometric_mean(&[]), 1.0);
    }

    #[test]
    fn test_stronger_player_rated_higher() {
        let games = games(&[
            ("1", &[("a", 2), ("b", 4), ("c", 6)]),
            ("2", &[("a", 3), ("b", 4), ("c", 5)]),
            ("3", &[("a", 2), ("b", 3), ("c", 4)]),
        ]);
        let fit = MapElo::default().fit(&OutcomeMatrix::from_games(&games));

        assert!(fit.converged);
        assert!(fit.elo[0] > fit.elo[1]);
        assert!(fit.elo[1] > fit.elo[2]);
        assert!((geometric_mean(&fit.strengths) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_isolated_player_stays_at_initial_rating() {
        let games = games(&[
            ("1", &[("a", 2), ("b", 5)]),
            ("2", &[("a", 3), ("b", 6)]),
            ("3", &[("loner", 1)]),
        ]);
        let matrix = OutcomeMatrix::from_games(&games);
        assert!(!matrix.has_games(2));

        for max_iterations in [1, 2, 10, 200] {
            let fit = MapElo::new(DEFAULT_TOLERANCE, max_iterations).fit(&matrix);
            assert_eq!(fit.strengths[2], 1.0);
            assert_eq!(fit.elo[2], 1000.0);
        }
    }

    #[test]
    fn test_undefeated_player_stays_finite() {
        let games = games(&[
            ("1", &[("a", 1), ("b", 6)]),
            ("2", &[("a", 1), ("b", 6)]),
        ]);
        let fit = MapElo::default().fit(&OutcomeMatrix::from_games(&games));

        assert!(fit.elo.iter().all(|e| e.is_finite()));
        assert!(fit.elo[0] > 1000.0);
        assert!((fit.elo[0] - 1000.0 + fit.elo[1] - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_sweep_updates_in_place() {
        // Later players in a sweep see strengths already updated this sweep
        let games = games(&[
            ("1", &[("a", 2), ("b", 4), ("c", 6)]),
            ("2", &[("a", 3), ("b", 5)]),
        ]);
        let fit = MapElo::new(1e-300, 1).fit(&OutcomeMatrix::from_games(&games));

        assert_eq!(fit.iterations, 1);
        let expected = [1.7497297607396425, 0.9974373161092392, 0.5729852064063653];
        for (actual, expected) in fit.strengths.iter().zip(expected) {
            assert!(
                (actual - expected).abs() < 1e-12,
                "strength {} != {}",
                actual,
                expected
            );
        }
    }

    #[test]
    fn test_iteration_cap_respected() {
        let games = games(&[
            ("1", &[("a", 2), ("b", 4), ("c", 6)]),
            ("2", &[("a", 5), ("b", 4), ("c", 3)]),
        ]);
        let fit = MapElo::new(1e-300, 3).fit(&OutcomeMatrix::from_games(&games));

        assert_eq!(fit.iterations, 3);
        assert_eq!(fit.nll_history.len(), 3);
        assert!(!fit.converged);
    }

    #[test]
    fn test_nll_non_increasing_for_simple_case() {
        let games = games(&[
            ("1", &[("a", 2), ("b", 4)]),
            ("2", &[("a", 3), ("b", 4)]),
            ("3", &[("a", 5), ("b", 4)]),
        ]);
        let matrix = OutcomeMatrix::from_games(&games);
        let fit = MapElo::default().fit(&matrix);

        let initial = negative_log_likelihood(&matrix, &[1000.0, 1000.0]);
        assert!((initial - 2f64.log10()).abs() < 1e-12);
        let last = *fit.nll_history.last().unwrap();
        assert!(last <= initial + 1e-12);
    }

    #[test]
    fn test_no_games_at_all() {
        let matrix = OutcomeMatrix::new(0);
        let fit = MapElo::default().fit(&matrix);
        assert!(fit.elo.is_empty());
        assert!(fit.converged);
        assert_eq!(negative_log_likelihood(&matrix, &[]), 0.0);
    }
}
