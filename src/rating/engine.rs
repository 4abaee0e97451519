//! Rating engine trait
//!
//! Every ranking method turns a `GameSet` into one rating per player, in the
//! same order as the game set's player index.

use crate::rating::games::GameSet;
use crate::types::RankOrder;

/// Trait for computing per-player ratings from a full set of games
pub trait RatingEngine: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Whether higher or lower ratings rank first
    fn rank_order(&self) -> RankOrder;

    /// Compute ratings for every player in `games`, indexed like
    /// `games.players()`
    fn ratings(&self, games: &GameSet) -> Vec<f64>;
}
