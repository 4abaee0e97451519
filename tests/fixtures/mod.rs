//! Test fixtures for building day groups

#![allow(dead_code)]

use puzzle_leaderboard::{DayGroup, PlayerScore};

/// Build a day group from `(player, score)` pairs
pub fn day(key: &str, results: &[(&str, u8)]) -> DayGroup {
    DayGroup::new(
        key,
        results
            .iter()
            .map(|&(id, score)| PlayerScore::new(id, score))
            .collect(),
    )
}

/// A deterministic season where `skills[i]` is player i's typical score.
///
/// Scores wobble by -1, 0 or +1 around the skill in a fixed pattern, and
/// every third player sits out every fifth day.
pub fn season(skills: &[u8], days: usize) -> Vec<DayGroup> {
    (0..days)
        .map(|d| {
            let results = skills
                .iter()
                .enumerate()
                .filter(|(i, _)| !(i % 3 == 2 && d % 5 == 4))
                .map(|(i, &skill)| {
                    let wobble = ((d * 7 + i * 3) % 3) as i16 - 1;
                    let score = (i16::from(skill) + wobble).clamp(1, 6) as u8;
                    PlayerScore::new(format!("player_{:02}", i), score)
                })
                .collect();
            DayGroup::new(format!("{}", 1000 + d), results)
        })
        .collect()
}
