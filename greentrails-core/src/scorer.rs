//! Score catalogued trails for a user.
//!
//! The `Scorer` trait assigns a relevance score to a [`Trail`] given the
//! acting user's [`UserContext`]. Higher scores rank earlier.

use crate::{Trail, UserContext};

/// Calculate a recommendation score for a trail.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so candidate sets
/// can be scored across threads. The method is infallible and must return a
/// finite, non-negative value; scores carry no upper bound and are only
/// comparable within one user's candidate set.
///
/// # Examples
///
/// ```rust
/// use chrono::Utc;
/// use greentrails_core::{Difficulty, Scorer, Trail, UserContext, UserPreferences};
///
/// struct UnitScorer;
///
/// impl Scorer for UnitScorer {
///     fn score(&self, _trail: &Trail, _context: &UserContext) -> f64 {
///         1.0
///     }
/// }
///
/// let trail = Trail::new("hp-1", "Loop", Difficulty::Easy, 1.0, "Boulder, CO");
/// let context = UserContext::new(UserPreferences::new(), Utc::now());
/// assert_eq!(UnitScorer.score(&trail, &context), 1.0);
/// ```
pub trait Scorer: Send + Sync {
    /// Return a score for `trail` according to `context`.
    fn score(&self, trail: &Trail, context: &UserContext) -> f64;

    /// Replace non-finite and negative raw scores with `0.0`.
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        if score.is_finite() { score.max(0.0) } else { 0.0 }
    }
}
