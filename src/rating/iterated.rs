//! Sequential Elo over days
//!
//! Walks the days in the order the caller supplied them and applies a
//! pairwise Elo update for every ordered pair of participants. Updates land
//! in the shared rating vector immediately, so later pairs on the same day
//! see the ratings produced by earlier ones. Pairs are visited with the first
//! player ascending by index, then the second ascending (see
//! `IndexedDay::ordered_pairs`), which makes results reproducible.

use crate::rating::engine::RatingEngine;
use crate::rating::games::GameSet;
use crate::rating::points::point;
use crate::rating::INITIAL_ELO;
use crate::types::RankOrder;
use skillratings::elo::EloRating;
use tracing::debug;

/// Logistic expected score of a player rated `elo_i` against `elo_j`
pub fn expected_score(elo_i: f64, elo_j: f64) -> f64 {
    let (expected, _) = skillratings::elo::expected_score(
        &EloRating { rating: elo_i },
        &EloRating { rating: elo_j },
    );
    expected
}

/// Apply one pairwise Elo update where player i earned `sa` points.
///
/// Returns the new `(elo_i, elo_j)`. Whatever i gains, j loses.
pub fn update_pair(elo_i: f64, elo_j: f64, sa: f64, k: f64) -> (f64, f64) {
    let ea = expected_score(elo_i, elo_j);
    let delta = k * (sa - ea);
    (elo_i + delta, elo_j - delta)
}

/// Rating vectors after each day, starting with the initial all-1000 vector
#[derive(Debug, Clone)]
pub struct EloHistory {
    pub snapshots: Vec<Vec<f64>>,
}

impl EloHistory {
    /// Ratings after the last day
    pub fn final_ratings(&self) -> &[f64] {
        self.snapshots.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Iterated Elo engine
#[derive(Debug, Clone)]
pub struct IteratedElo {
    k: f64,
}

impl IteratedElo {
    pub fn new(k: f64) -> Self {
        Self { k }
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    /// Replay every day and record the rating vector after each one
    pub fn run(&self, games: &GameSet) -> EloHistory {
        let max_score = games.max_score();
        let mut elo = vec![INITIAL_ELO; games.player_count()];
        let mut snapshots = Vec::with_capacity(games.days().len() + 1);
        snapshots.push(elo.clone());

        for day in games.days() {
            for ((i, score_i), (j, score_j)) in day.ordered_pairs() {
                let sa = point(score_i, score_j, max_score);
                let (new_i, new_j) = update_pair(elo[i], elo[j], sa, self.k);
                elo[i] = new_i;
                elo[j] = new_j;
            }
            snapshots.push(elo.clone());
        }

        debug!(
            "Iterated Elo replayed {} days for {} players (K = {})",
            games.days().len(),
            games.player_count(),
            self.k
        );

        EloHistory { snapshots }
    }
}

impl RatingEngine for IteratedElo {
    fn name(&self) -> &'static str {
        "elo-iterated"
    }

    fn rank_order(&self) -> RankOrder {
        RankOrder::HigherIsBetter
    }

    fn ratings(&self, games: &GameSet) -> Vec<f64> {
        self.run(games).final_ratings().to_vec()
    }
}
