//! Bonus weights for the additive recommendation score.

use serde::{Deserialize, Serialize};

use crate::ScoreWeightsError;

/// Points awarded by [`RecommendationScorer`](crate::RecommendationScorer).
///
/// The default reproduces the GreenTrails formula: base 1.0, +2.0 for a
/// difficulty match, +2.0 for a length within range, +0.5 per favourite tag,
/// +1.5 for a preferred location, +0.3 per recent interaction, +1.0 when
/// liked and +0.5 when verified, with a 30-day recency window.
///
/// # Examples
/// ```
/// use greentrails_scorer::ScoreWeights;
///
/// let weights = ScoreWeights {
///     verified: 0.0,
///     ..ScoreWeights::default()
/// }
/// .validate()
/// .unwrap();
/// assert_eq!(weights.base, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Score every trail starts with.
    pub base: f64,
    /// Bonus when the trail difficulty equals the preferred difficulty.
    pub difficulty_match: f64,
    /// Bonus when the trail length lies within the preferred range.
    pub length_in_range: f64,
    /// Bonus per favourite tag the trail carries.
    pub per_favorite_tag: f64,
    /// Bonus when the location mentions a preferred place.
    pub location_match: f64,
    /// Bonus per interaction with the trail inside the recency window.
    pub per_recent_interaction: f64,
    /// Bonus when the user liked the trail.
    pub liked: f64,
    /// Bonus when the trail data is verified.
    pub verified: f64,
    /// Length of the recency window in days.
    pub recent_window_days: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            base: 1.0,
            difficulty_match: 2.0,
            length_in_range: 2.0,
            per_favorite_tag: 0.5,
            location_match: 1.5,
            per_recent_interaction: 0.3,
            liked: 1.0,
            verified: 0.5,
            recent_window_days: 30,
        }
    }
}

impl ScoreWeights {
    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`ScoreWeightsError::InvalidWeight`] when a weight is not a
    /// finite, non-negative number and [`ScoreWeightsError::EmptyWindow`] when
    /// the recency window is zero days.
    pub fn validate(self) -> Result<Self, ScoreWeightsError> {
        if let Some((name, value)) = self
            .named()
            .into_iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(ScoreWeightsError::InvalidWeight { name, value });
        }
        if self.recent_window_days == 0 {
            return Err(ScoreWeightsError::EmptyWindow);
        }
        Ok(self)
    }

    const fn named(self) -> [(&'static str, f64); 8] {
        [
            ("base", self.base),
            ("difficulty_match", self.difficulty_match),
            ("length_in_range", self.length_in_range),
            ("per_favorite_tag", self.per_favorite_tag),
            ("location_match", self.location_match),
            ("per_recent_interaction", self.per_recent_interaction),
            ("liked", self.liked),
            ("verified", self.verified),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_are_valid() {
        assert_eq!(
            ScoreWeights::default().validate(),
            Ok(ScoreWeights::default())
        );
    }

    #[rstest]
    #[case(ScoreWeights { liked: -1.0, ..ScoreWeights::default() }, "liked")]
    #[case(ScoreWeights { base: f64::NAN, ..ScoreWeights::default() }, "base")]
    #[case(ScoreWeights { verified: f64::INFINITY, ..ScoreWeights::default() }, "verified")]
    fn rejects_unusable_weights(#[case] weights: ScoreWeights, #[case] field: &str) {
        match weights.validate() {
            Err(ScoreWeightsError::InvalidWeight { name, .. }) => assert_eq!(name, field),
            other => panic!("expected invalid weight error, got {other:?}"),
        }
    }

    #[rstest]
    fn rejects_empty_window() {
        let weights = ScoreWeights {
            recent_window_days: 0,
            ..ScoreWeights::default()
        };
        assert_eq!(weights.validate(), Err(ScoreWeightsError::EmptyWindow));
    }

    #[rstest]
    fn partial_json_keeps_defaults() {
        let weights: ScoreWeights =
            serde_json::from_str(r#"{"liked": 3.0}"#).expect("decode weights");
        assert_eq!(weights.liked, 3.0);
        assert_eq!(weights.base, 1.0);
        assert_eq!(weights.recent_window_days, 30);
    }
}
