//! Core domain types for the GreenTrails engine.
//!
//! The crate holds the vocabulary every other crate shares: the four
//! difficulty levels and their standardizer, the provider enum, the
//! normalized and catalogued trail records, user preferences and
//! interaction history, and the two seams the rest of the workspace plugs
//! into: [`Scorer`] for recommendation and [`TrailSink`] for persistence.
//!
//! Nothing here performs I/O.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod difficulty;
pub mod preferences;
pub mod scorer;
pub mod sink;
pub mod source;
pub mod trail;

pub use difficulty::{Difficulty, ParseDifficultyError};
pub use preferences::{
    InteractionType, LengthRange, PreferencesError, TrailInteraction, UserContext,
    UserPreferences,
};
pub use scorer::Scorer;
pub use sink::{SinkError, TrailSink};
pub use source::{TrailSource, UnknownSourceError};
pub use trail::{KM_PER_MILE, NormalizedTrail, Trail, km_to_miles, miles_to_km};
