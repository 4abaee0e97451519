//! Validated, indexed view of one invocation's game results
//!
//! Players are identified by caller-provided string IDs. A `GameSet` maps
//! them once to dense indices in ascending ID order, and stores every day
//! group with its results sorted by that index. Every engine walks this
//! structure, so all traversal orders are fixed here.

use crate::error::{RankingError, Result};
use crate::types::{DayGroup, DayKey, PlayerId};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Maps between player IDs and internal 0..N indices
#[derive(Debug, Clone, Default)]
pub struct PlayerIndex {
    ids: Vec<PlayerId>,
    id_to_idx: HashMap<PlayerId, usize>,
}

impl PlayerIndex {
    /// Build an index over the given IDs, sorted ascending
    pub fn from_ids(ids: impl IntoIterator<Item = PlayerId>) -> Self {
        let ids: Vec<PlayerId> = ids
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let id_to_idx = ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();

        Self { ids, id_to_idx }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.id_to_idx.get(id).copied()
    }

    pub fn id(&self, idx: usize) -> &PlayerId {
        &self.ids[idx]
    }

    pub fn ids(&self) -> &[PlayerId] {
        &self.ids
    }
}

/// One day's results keyed by player index
#[derive(Debug, Clone)]
pub struct IndexedDay {
    pub day_key: DayKey,
    /// `(player index, raw score)`, ascending by player index
    pub results: Vec<(usize, u8)>,
}

impl IndexedDay {
    /// Every ordered pair of distinct participants, `i` ascending then `j`
    /// ascending. Both `(i, j)` and `(j, i)` are produced.
    pub fn ordered_pairs(&self) -> impl Iterator<Item = ((usize, u8), (usize, u8))> + '_ {
        self.results.iter().flat_map(move |&first| {
            self.results
                .iter()
                .filter(move |&&second| second.0 != first.0)
                .map(move |&second| (first, second))
        })
    }
}

/// All games for one engine invocation
#[derive(Debug, Clone)]
pub struct GameSet {
    players: PlayerIndex,
    days: Vec<IndexedDay>,
    games_played: Vec<u32>,
    max_score: u8,
}

impl GameSet {
    /// Validate day groups and build the indexed game set.
    ///
    /// Days keep the caller's order. Empty day groups are skipped. Scores
    /// must lie in `1..=max_score`, a player may appear once per day, and a
    /// day key may appear once overall.
    pub fn new(day_groups: &[DayGroup], max_score: u8) -> Result<Self> {
        if max_score < 2 {
            return Err(RankingError::ConfigurationError {
                message: format!("Max score must be at least 2, got {}", max_score),
            });
        }

        let mut seen_days: HashSet<&str> = HashSet::with_capacity(day_groups.len());
        let mut player_ids: BTreeSet<&str> = BTreeSet::new();

        for group in day_groups {
            if group.results.is_empty() {
                debug!("Skipping empty day group {}", group.day_key);
                continue;
            }

            if !seen_days.insert(group.day_key.as_str()) {
                return Err(RankingError::DuplicateDay {
                    day_key: group.day_key.clone(),
                });
            }

            let mut seen_players: HashSet<&str> = HashSet::with_capacity(group.results.len());
            for result in &group.results {
                if !(1..=max_score).contains(&result.score) {
                    return Err(RankingError::InvalidScore {
                        player_id: result.player_id.clone(),
                        day_key: group.day_key.clone(),
                        score: result.score,
                        max_score,
                    });
                }

                if !seen_players.insert(result.player_id.as_str()) {
                    return Err(RankingError::DuplicateResult {
                        player_id: result.player_id.clone(),
                        day_key: group.day_key.clone(),
                    });
                }

                player_ids.insert(result.player_id.as_str());
            }
        }

        let players = PlayerIndex::from_ids(player_ids.into_iter().map(str::to_string));
        let mut games_played = vec![0u32; players.len()];
        let mut days = Vec::with_capacity(seen_days.len());

        for group in day_groups.iter().filter(|g| !g.results.is_empty()) {
            let mut results: Vec<(usize, u8)> = group
                .results
                .iter()
                .filter_map(|r| players.index_of(&r.player_id).map(|idx| (idx, r.score)))
                .collect();
            results.sort_unstable_by_key(|&(idx, _)| idx);

            for &(idx, _) in &results {
                games_played[idx] += 1;
            }

            days.push(IndexedDay {
                day_key: group.day_key.clone(),
                results,
            });
        }

        debug!(
            "Indexed {} players across {} days (max score {})",
            players.len(),
            days.len(),
            max_score
        );

        Ok(Self {
            players,
            days,
            games_played,
            max_score,
        })
    }

    pub fn players(&self) -> &PlayerIndex {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn days(&self) -> &[IndexedDay] {
        &self.days
    }

    /// Number of days each player appears in, by player index
    pub fn games_played(&self) -> &[u32] {
        &self.games_played
    }

    pub fn max_score(&self) -> u8 {
        self.max_score
    }

    /// Total number of individual results across all days
    pub fn result_count(&self) -> usize {
        self.days.iter().map(|d| d.results.len()).sum()
    }
}
