//! Additive preference scoring for catalogued trails.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use greentrails_core::{Scorer, Trail, UserContext, UserPreferences};

use crate::{ScoreWeights, ScoreWeightsError};

/// Scores trails by summing fixed bonuses for each preference they satisfy.
///
/// Scores are unbounded and only comparable within one user's candidates:
/// a user with a long interaction history earns larger totals across the
/// board.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use greentrails_core::{Difficulty, LengthRange, Scorer, Trail, UserContext, UserPreferences};
/// use greentrails_scorer::RecommendationScorer;
///
/// let prefs = UserPreferences::new()
///     .with_difficulty(Difficulty::Moderate)
///     .with_length_range(LengthRange::new(2.0, 8.0).unwrap());
/// let context = UserContext::new(prefs, Utc::now());
/// let trail = Trail::new("hp-1", "Royal Arch", Difficulty::Moderate, 5.0, "Boulder, CO").verified();
///
/// assert_eq!(RecommendationScorer::default().score(&trail, &context), 5.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RecommendationScorer {
    weights: ScoreWeights,
}

/// Which preferences a trail satisfied, before weights are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Matches {
    difficulty: bool,
    length: bool,
    favorite_tags: u32,
    location: bool,
    recent_interactions: u32,
    liked: bool,
    verified: bool,
}

impl RecommendationScorer {
    /// Construct a scorer with validated weights.
    ///
    /// # Errors
    /// Propagates [`ScoreWeights::validate`] failures.
    pub fn new(weights: ScoreWeights) -> Result<Self, ScoreWeightsError> {
        weights.validate().map(|weights| Self { weights })
    }

    /// Weights in use.
    #[must_use]
    pub const fn weights(&self) -> ScoreWeights {
        self.weights
    }

    fn matches(&self, trail: &Trail, context: &UserContext) -> Matches {
        let preferences = &context.preferences;
        Matches {
            difficulty: preferences.preferred_difficulty == Some(trail.difficulty),
            length: preferences
                .preferred_length_range
                .is_some_and(|range| range.contains(trail.length)),
            favorite_tags: saturating_u32(favourite_tag_matches(preferences, &trail.tags)),
            location: location_matches(preferences, &trail.location),
            recent_interactions: saturating_u32(self.recent_interactions(trail, context)),
            liked: context.liked_trail_ids.contains(&trail.id),
            verified: trail.is_verified,
        }
    }

    fn recent_interactions(&self, trail: &Trail, context: &UserContext) -> usize {
        let Some(cutoff) = window_start(context.now, self.weights.recent_window_days) else {
            return 0;
        };
        context
            .interactions
            .iter()
            .filter(|interaction| interaction.trail_id == trail.id && interaction.created_at > cutoff)
            .count()
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "the score is a weighted sum of matched preferences"
    )]
    fn weigh(&self, matches: Matches) -> f64 {
        let w = self.weights;
        let flag = |hit: bool, bonus: f64| if hit { bonus } else { 0.0 };
        w.base
            + flag(matches.difficulty, w.difficulty_match)
            + flag(matches.length, w.length_in_range)
            + f64::from(matches.favorite_tags) * w.per_favorite_tag
            + flag(matches.location, w.location_match)
            + f64::from(matches.recent_interactions) * w.per_recent_interaction
            + flag(matches.liked, w.liked)
            + flag(matches.verified, w.verified)
    }
}

impl Scorer for RecommendationScorer {
    fn score(&self, trail: &Trail, context: &UserContext) -> f64 {
        let matches = self.matches(trail, context);
        <Self as Scorer>::sanitise(self.weigh(matches))
    }
}

/// Case-insensitive substring match against any non-blank preferred place.
fn location_matches(preferences: &UserPreferences, location: &str) -> bool {
    let location = location.to_lowercase();
    preferences
        .location_preferences
        .iter()
        .map(|place| place.trim().to_lowercase())
        .any(|place| !place.is_empty() && location.contains(&place))
}

/// Count distinct favourite tags carried by the trail, ignoring case.
fn favourite_tag_matches(preferences: &UserPreferences, tags: &[String]) -> usize {
    let carried: BTreeSet<String> = tags.iter().map(|tag| tag.trim().to_lowercase()).collect();
    preferences
        .favorite_tags
        .iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect::<BTreeSet<_>>()
        .intersection(&carried)
        .count()
}

fn window_start(now: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
    now.checked_sub_signed(TimeDelta::try_days(i64::from(days))?)
}

fn saturating_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
