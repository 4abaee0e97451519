//! Rating engines for daily puzzle results
//!
//! This module provides the pairwise point calculation, the indexed game set
//! every engine consumes, and the three ranking methods: iterated Elo, MAP
//! Elo, and adjusted average score.

pub mod average;
pub mod engine;
pub mod games;
pub mod iterated;
pub mod map;
pub mod points;

/// Rating every player starts from, and the anchor of the MAP Elo scale
pub const INITIAL_ELO: f64 = 1000.0;

/// Elo points per factor of ten in Bradley-Terry strength
pub const ELO_SCALE: f64 = 400.0;

// Re-export commonly used types
pub use average::{AverageReport, AverageScore, PlayerAverage, PopulationStats};
pub use engine::RatingEngine;
pub use games::{GameSet, IndexedDay, PlayerIndex};
pub use iterated::{EloHistory, IteratedElo};
pub use map::{MapElo, MapEloFit, OutcomeMatrix};
pub use points::point;
