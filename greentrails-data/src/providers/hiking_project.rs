//! Hiking Project `get-trails` records.

use std::sync::LazyLock;

use greentrails_core::{Difficulty, NormalizedTrail, TrailSource, miles_to_km};
use regex::Regex;
use serde::Deserialize;

use super::{id_string, lenient_f64, lenient_string, name_or_placeholder};
use crate::tags::TagSet;

/// Trailing two-letter state code in a location such as `Boulder, CO`.
static STATE_SUFFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r",\s*([A-Z]{2})\s*$").ok());

/// One trail from the Hiking Project API. Lengths are miles, elevations feet.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HikingProjectTrail {
    /// Provider identifier.
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    /// Trail name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Short description.
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    /// Colour label such as `greenBlue` or `black`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub difficulty: Option<String>,
    /// Average star rating out of five.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub stars: Option<f64>,
    /// Place description, usually `City, State`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    /// Trailhead latitude.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    /// Trailhead longitude.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    /// Length in miles.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub length: Option<f64>,
    /// Total ascent in feet.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ascent: Option<f64>,
    /// Highest point in feet.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub high: Option<f64>,
    /// Listing type, e.g. `Featured Hike`.
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub trail_type: Option<String>,
}

impl HikingProjectTrail {
    /// Map the record onto the shared trail shape.
    ///
    /// # Examples
    /// ```
    /// use greentrails_core::Difficulty;
    /// use greentrails_data::HikingProjectTrail;
    ///
    /// let trail = HikingProjectTrail {
    ///     id: "42".into(),
    ///     difficulty: Some("blueBlack".into()),
    ///     location: Some("Boulder, CO".into()),
    ///     length: Some(10.0),
    ///     ..HikingProjectTrail::default()
    /// };
    /// let normalized = trail.normalize();
    /// assert_eq!(normalized.id, "hp-42");
    /// assert_eq!(normalized.difficulty, Difficulty::Moderate);
    /// assert_eq!(normalized.state_province.as_deref(), Some("CO"));
    /// ```
    #[must_use]
    pub fn normalize(&self) -> NormalizedTrail {
        let source = TrailSource::HikingProject;
        let length = self.length.unwrap_or(0.0);
        let location = self
            .location
            .clone()
            .unwrap_or_else(|| "Unknown".to_owned());
        NormalizedTrail {
            id: source.trail_id(&self.id),
            name: name_or_placeholder(self.name.as_deref(), &self.id),
            description: self.summary.clone(),
            latitude: self.latitude.unwrap_or(0.0),
            longitude: self.longitude.unwrap_or(0.0),
            difficulty: Difficulty::standardize(self.difficulty.as_deref()),
            length,
            length_km: miles_to_km(length),
            elevation_gain: self.ascent.unwrap_or(0.0),
            elevation: self.high.unwrap_or(0.0),
            state_province: state_from_location(&location),
            location,
            country: "United States".to_owned(),
            surface: None,
            trail_type: self.trail_type.clone(),
            tags: self.tags(),
            source,
            source_id: self.id.clone(),
            geojson: None,
            is_age_restricted: false,
        }
    }

    /// Derive tags from the difficulty label, rating, length and elevation.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let mut tags = TagSet::default();
        let label = self.difficulty.as_deref().unwrap_or_default().to_lowercase();
        if label.contains("green") {
            tags.insert("beginner-friendly");
        }
        if label.contains("black") {
            tags.insert("challenging");
        }
        if let Some(stars) = self.stars {
            if stars >= 4.5 {
                tags.insert("highly-rated");
            }
            if stars >= 4.0 {
                tags.insert("popular");
            }
        }
        if let Some(length) = self.length {
            if length > 10.0 {
                tags.insert("long-distance");
            }
            if length < 3.0 {
                tags.insert("short-hike");
            }
        }
        if self.ascent.is_some_and(|ascent| ascent > 1000.0) {
            tags.insert("steep");
        }
        if self.high.is_some_and(|high| high > 8000.0) {
            tags.insert("high-altitude");
        }
        tags.finish()
    }
}

fn state_from_location(location: &str) -> Option<String> {
    STATE_SUFFIX
        .as_ref()?
        .captures(location)
        .and_then(|captures| captures.get(1))
        .map(|code| code.as_str().to_owned())
}
