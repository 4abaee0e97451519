//! Graded pairwise outcomes from raw puzzle scores
//!
//! Two players' guess counts on the same puzzle become a fractional "game"
//! result: a tie is worth half a point, and the best possible score against
//! the worst possible score is worth a full point.

/// Points earned by a player scoring `a` against an opponent scoring `b`.
///
/// `0.5 + (b - a) / (max_score - 1) / 2`, so lower scores (fewer guesses)
/// earn more. `point(a, b) + point(b, a)` is exactly 1.
pub fn point(a: u8, b: u8, max_score: u8) -> f64 {
    debug_assert!(max_score >= 2);
    debug_assert!((1..=max_score).contains(&a) && (1..=max_score).contains(&b));

    if a > b {
        // Mirror the winning side so the two halves sum to exactly 1.0
        return 1.0 - point(b, a, max_score);
    }

    let spread = f64::from(max_score) - 1.0;
    0.5 + (f64::from(b) - f64::from(a)) / spread / 2.0
}
