//! Recommendation scoring for GreenTrails.
//!
//! [`RecommendationScorer`] implements the core
//! [`Scorer`](greentrails_core::Scorer) trait with a purely additive formula
//! over the user's declared preferences, recent interactions and likes.
//! [`recommend`] ranks a candidate set with any scorer and keeps the best.
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use greentrails_core::{Difficulty, Trail, UserContext, UserPreferences};
//! use greentrails_scorer::{RecommendationScorer, recommend};
//!
//! let trails = vec![
//!     Trail::new("hp-1", "Mesa", Difficulty::Easy, 2.0, "Boulder, CO"),
//!     Trail::new("hp-2", "Bear Peak", Difficulty::Hard, 8.0, "Boulder, CO"),
//! ];
//! let prefs = UserPreferences::new().with_difficulty(Difficulty::Hard);
//! let context = UserContext::new(prefs, Utc::now());
//!
//! let ranked = recommend(&RecommendationScorer::default(), trails, &context, 1);
//! assert_eq!(ranked[0].trail.id, "hp-2");
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use greentrails_core::{Scorer, Trail, UserContext};
use log::debug;
use serde::Serialize;

mod error;
mod recommendation;
mod weights;

pub use error::ScoreWeightsError;
pub use recommendation::RecommendationScorer;
pub use weights::ScoreWeights;

/// A trail paired with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTrail {
    /// Relevance score; higher ranks earlier.
    pub score: f64,
    /// The scored trail.
    #[serde(flatten)]
    pub trail: Trail,
}

/// Score every candidate, sort by descending score and keep `limit`.
///
/// The sort is stable, so equally scored trails keep their input order.
#[must_use]
pub fn recommend<S, I>(scorer: &S, trails: I, context: &UserContext, limit: usize) -> Vec<ScoredTrail>
where
    S: Scorer + ?Sized,
    I: IntoIterator<Item = Trail>,
{
    let mut scored: Vec<ScoredTrail> = trails
        .into_iter()
        .map(|trail| ScoredTrail {
            score: scorer.score(&trail, context),
            trail,
        })
        .collect();
    let candidates = scored.len();
    scored.sort_by(|left, right| right.score.total_cmp(&left.score));
    scored.truncate(limit);
    debug!("Ranked {candidates} candidate trails, returning {}", scored.len());
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use greentrails_core::{Difficulty, UserPreferences};
    use rstest::{fixture, rstest};

    #[fixture]
    fn context() -> UserContext {
        let now = Utc
            .with_ymd_and_hms(2026, 10, 16, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        UserContext::new(
            UserPreferences::new().with_difficulty(Difficulty::Moderate),
            now,
        )
        .with_liked("hp-3")
    }

    #[fixture]
    fn trails() -> Vec<Trail> {
        vec![
            Trail::new("hp-1", "Flat", Difficulty::Easy, 1.0, "Denver, CO"),
            Trail::new("hp-2", "Arch", Difficulty::Moderate, 3.0, "Boulder, CO"),
            Trail::new("hp-3", "Ridge", Difficulty::Moderate, 9.0, "Boulder, CO"),
            Trail::new("hp-4", "Creek", Difficulty::Easy, 2.0, "Lyons, CO"),
        ]
    }

    fn ids(scored: &[ScoredTrail]) -> Vec<&str> {
        scored.iter().map(|entry| entry.trail.id.as_str()).collect()
    }

    #[rstest]
    fn ranks_descending_with_stable_ties(context: UserContext, trails: Vec<Trail>) {
        let ranked = recommend(&RecommendationScorer::default(), trails, &context, 10);
        assert_eq!(ids(&ranked), ["hp-3", "hp-2", "hp-1", "hp-4"]);
        assert_eq!(ranked[0].score, 4.0);
        assert_eq!(ranked[1].score, 3.0);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(2, 2)]
    #[case(99, 4)]
    fn truncates_to_limit(
        context: UserContext,
        trails: Vec<Trail>,
        #[case] limit: usize,
        #[case] expected: usize,
    ) {
        let ranked = recommend(&RecommendationScorer::default(), trails, &context, limit);
        assert_eq!(ranked.len(), expected);
    }

    #[rstest]
    fn works_through_trait_objects(context: UserContext, trails: Vec<Trail>) {
        let scorer: Box<dyn Scorer> = Box::new(RecommendationScorer::default());
        let ranked = recommend(scorer.as_ref(), trails, &context, 1);
        assert_eq!(ids(&ranked), ["hp-3"]);
    }

    #[rstest]
    fn serializes_flat(context: UserContext, trails: Vec<Trail>) {
        let ranked = recommend(&RecommendationScorer::default(), trails, &context, 1);
        let value = serde_json::to_value(&ranked[0]).expect("serialize");
        assert_eq!(value["id"], "hp-3");
        assert_eq!(value["score"], 4.0);
    }
}
