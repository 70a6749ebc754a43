//! User-side scoring inputs: preferences, interaction history and the
//! bundle handed to a [`Scorer`](crate::Scorer).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Difficulty;

/// Errors returned when constructing user preferences.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PreferencesError {
    /// The range bounds were reversed.
    #[error("length range minimum {min} exceeds maximum {max}")]
    InvertedRange {
        /// Lower bound supplied.
        min: f64,
        /// Upper bound supplied.
        max: f64,
    },
    /// A bound was NaN or infinite.
    #[error("length range bounds must be finite")]
    NonFiniteBound,
}

/// Inclusive trail length range in miles, serialized as `[min, max]`.
///
/// # Examples
/// ```
/// use greentrails_core::LengthRange;
///
/// let range = LengthRange::new(2.0, 8.0).unwrap();
/// assert!(range.contains(2.0));
/// assert!(range.contains(8.0));
/// assert!(!range.contains(8.5));
/// assert!(LengthRange::new(5.0, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct LengthRange {
    min: f64,
    max: f64,
}

impl LengthRange {
    /// Validate and construct a range.
    ///
    /// # Errors
    /// Returns [`PreferencesError`] when a bound is not finite or
    /// `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, PreferencesError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(PreferencesError::NonFiniteBound);
        }
        if min > max {
            return Err(PreferencesError::InvertedRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound in miles.
    #[must_use]
    pub const fn min(self) -> f64 {
        self.min
    }

    /// Upper bound in miles.
    #[must_use]
    pub const fn max(self) -> f64 {
        self.max
    }

    /// Report whether `length` lies within the range, bounds included.
    #[must_use]
    pub fn contains(self, length: f64) -> bool {
        (self.min..=self.max).contains(&length)
    }
}

impl TryFrom<(f64, f64)> for LengthRange {
    type Error = PreferencesError;

    fn try_from((min, max): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(min, max)
    }
}

impl From<LengthRange> for (f64, f64) {
    fn from(range: LengthRange) -> Self {
        (range.min, range.max)
    }
}

/// A user's declared trail preferences.
///
/// # Examples
/// ```
/// use greentrails_core::{Difficulty, LengthRange, UserPreferences};
///
/// let prefs = UserPreferences::new()
///     .with_difficulty(Difficulty::Moderate)
///     .with_length_range(LengthRange::new(2.0, 8.0).unwrap())
///     .with_favorite_tag("waterfall")
///     .with_location("colorado");
/// assert_eq!(prefs.preferred_difficulty, Some(Difficulty::Moderate));
/// assert!(prefs.favorite_tags.contains("waterfall"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Difficulty the user enjoys most.
    #[serde(default)]
    pub preferred_difficulty: Option<Difficulty>,
    /// Trail lengths the user is comfortable with.
    #[serde(default)]
    pub preferred_length_range: Option<LengthRange>,
    /// Tags the user looks for.
    #[serde(default)]
    pub favorite_tags: BTreeSet<String>,
    /// Place names the user prefers.
    #[serde(default)]
    pub location_preferences: BTreeSet<String>,
    /// Preferred time of day, e.g. `morning`.
    #[serde(default)]
    pub time_of_day: Option<String>,
}

impl UserPreferences {
    /// Construct empty preferences.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the preferred difficulty while returning `self` for chaining.
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.preferred_difficulty = Some(difficulty);
        self
    }

    /// Set the preferred length range while returning `self` for chaining.
    #[must_use]
    pub const fn with_length_range(mut self, range: LengthRange) -> Self {
        self.preferred_length_range = Some(range);
        self
    }

    /// Add a favourite tag while returning `self` for chaining.
    #[must_use]
    pub fn with_favorite_tag(mut self, tag: impl Into<String>) -> Self {
        self.favorite_tags.insert(tag.into());
        self
    }

    /// Add a preferred location while returning `self` for chaining.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location_preferences.insert(location.into());
        self
    }
}

/// Kind of engagement a user had with a trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    /// Opened the trail page.
    View,
    /// Liked the trail.
    Like,
    /// Commented on the trail.
    Comment,
    /// Recorded a hike on the trail.
    Hike,
}

/// One recorded engagement with a trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailInteraction {
    /// Trail the interaction refers to.
    pub trail_id: String,
    /// What the user did.
    pub interaction_type: InteractionType,
    /// When it happened.
    pub created_at: DateTime<Utc>,
}

impl TrailInteraction {
    /// Construct an interaction record.
    pub fn new(
        trail_id: impl Into<String>,
        interaction_type: InteractionType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            trail_id: trail_id.into(),
            interaction_type,
            created_at,
        }
    }
}

/// Everything a scorer knows about the acting user.
///
/// `now` anchors the interaction recency window; it defaults to the current
/// time when deserialized without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    /// Declared preferences.
    #[serde(default)]
    pub preferences: UserPreferences,
    /// Interaction history, in any order.
    #[serde(default)]
    pub interactions: Vec<TrailInteraction>,
    /// Identifiers of trails the user liked.
    #[serde(default)]
    pub liked_trail_ids: BTreeSet<String>,
    /// Reference instant for recency checks.
    #[serde(default = "Utc::now")]
    pub now: DateTime<Utc>,
}

impl UserContext {
    /// Construct a context with no history, anchored at `now`.
    #[must_use]
    pub const fn new(preferences: UserPreferences, now: DateTime<Utc>) -> Self {
        Self {
            preferences,
            interactions: Vec::new(),
            liked_trail_ids: BTreeSet::new(),
            now,
        }
    }

    /// Append an interaction while returning `self` for chaining.
    #[must_use]
    pub fn with_interaction(mut self, interaction: TrailInteraction) -> Self {
        self.interactions.push(interaction);
        self
    }

    /// Record a liked trail while returning `self` for chaining.
    #[must_use]
    pub fn with_liked(mut self, trail_id: impl Into<String>) -> Self {
        self.liked_trail_ids.insert(trail_id.into());
        self
    }
}
