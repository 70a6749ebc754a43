//! Facade crate for the GreenTrails trail engine.
//!
//! This crate re-exports the core domain types and exposes provider import
//! and recommendation scoring behind feature flags.
//!
//! ```
//! # #[cfg(all(feature = "data", feature = "scorer"))]
//! # {
//! use greentrails::{RecommendationScorer, Trail, UserContext, UserPreferences, normalize_trail};
//! use serde_json::json;
//!
//! let record = json!({"id": 7, "name": "Mesa Trail", "difficulty": "blue", "length": 6.7});
//! let trail = Trail::from_normalized(&normalize_trail(&record, "hiking_project", None).unwrap());
//! let context = UserContext::new(UserPreferences::new(), chrono::Utc::now());
//! let ranked = greentrails::recommend(&RecommendationScorer::default(), [trail], &context, 5);
//! assert_eq!(ranked[0].trail.id, "hp-7");
//! # }
//! ```

#![forbid(unsafe_code)]

pub use greentrails_core::{
    Difficulty, InteractionType, LengthRange, NormalizedTrail, Scorer, SinkError, Trail,
    TrailInteraction, TrailSink, TrailSource, UserContext, UserPreferences,
};

#[cfg(feature = "data")]
pub use greentrails_data::{
    ImportOptions, ImportReport, NormalizeError, SqliteTrailStore, extract_tags, import_trails,
    normalize_trail,
};

#[cfg(feature = "scorer")]
pub use greentrails_scorer::{RecommendationScorer, ScoreWeights, ScoredTrail, recommend};
