//! Trail records: the normalized import shape and the catalogued shape
//! consumed by recommendation scoring.

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::{Difficulty, TrailSource};

/// Kilometres per statute mile.
pub const KM_PER_MILE: f64 = 1.60934;

/// Convert statute miles to kilometres.
///
/// # Examples
/// ```
/// use greentrails_core::miles_to_km;
///
/// assert!((miles_to_km(10.0) - 16.0934).abs() < 1e-9);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "unit conversion is a single multiplication"
)]
pub const fn miles_to_km(miles: f64) -> f64 {
    miles * KM_PER_MILE
}

/// Convert kilometres to statute miles.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "unit conversion is a single division"
)]
pub const fn km_to_miles(km: f64) -> f64 {
    km / KM_PER_MILE
}

/// A provider record mapped onto the shared `trails` row shape.
///
/// Values are produced once per provider record and handed to a
/// [`TrailSink`](crate::TrailSink) unchanged. `id` is always
/// `"{prefix}-{source_id}"` and `length_km` is always `length` expressed in
/// kilometres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTrail {
    /// Provider-prefixed identifier, e.g. `hp-12345`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-text summary, when the provider has one.
    pub description: Option<String>,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Standardized difficulty.
    pub difficulty: Difficulty,
    /// Length in miles.
    pub length: f64,
    /// Length in kilometres.
    pub length_km: f64,
    /// Total ascent in feet.
    pub elevation_gain: f64,
    /// Highest elevation in feet.
    pub elevation: f64,
    /// Human-readable place description.
    pub location: String,
    /// Country name.
    pub country: String,
    /// State or province code, when known.
    pub state_province: Option<String>,
    /// Surface type, e.g. `gravel`.
    pub surface: Option<String>,
    /// Trail classification, e.g. `hiking` or `path`.
    pub trail_type: Option<String>,
    /// Descriptive tags derived from the provider record.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Provider the record came from.
    pub source: TrailSource,
    /// Identifier within the provider.
    pub source_id: String,
    /// Raw geometry passed through from the provider.
    pub geojson: Option<serde_json::Value>,
    /// Always `false` when freshly normalized.
    pub is_age_restricted: bool,
}

impl NormalizedTrail {
    /// Return the trailhead as a `geo` coordinate (`x = longitude`,
    /// `y = latitude`).
    #[must_use]
    pub const fn coordinate(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

/// A catalogued trail as seen by the recommender.
///
/// # Examples
/// ```
/// use greentrails_core::{Difficulty, Trail};
///
/// let trail = Trail::new("hp-1", "Mesa Loop", Difficulty::Easy, 2.5, "Boulder, CO")
///     .with_tags(["hiking", "short-hike"])
///     .verified();
/// assert!(trail.is_verified);
/// assert_eq!(trail.tags.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    /// Trail identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Standardized difficulty.
    pub difficulty: Difficulty,
    /// Length in miles.
    pub length: f64,
    /// Human-readable place description.
    pub location: String,
    /// Descriptive tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether an administrator verified the trail data.
    #[serde(default)]
    pub is_verified: bool,
}

impl Trail {
    /// Construct an unverified trail without tags.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        difficulty: Difficulty,
        length: f64,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            difficulty,
            length,
            location: location.into(),
            tags: Vec::new(),
            is_verified: false,
        }
    }

    /// Catalogue a freshly normalized trail.
    #[must_use]
    pub fn from_normalized(trail: &NormalizedTrail) -> Self {
        Self {
            id: trail.id.clone(),
            name: trail.name.clone(),
            difficulty: trail.difficulty,
            length: trail.length,
            location: trail.location.clone(),
            tags: trail.tags.clone(),
            is_verified: false,
        }
    }

    /// Replace the tags while returning `self` for chaining.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the trail as verified while returning `self` for chaining.
    #[must_use]
    pub const fn verified(mut self) -> Self {
        self.is_verified = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn normalized() -> NormalizedTrail {
        NormalizedTrail {
            id: "usgs-abc".into(),
            name: "Ridge Trail".into(),
            description: None,
            latitude: 40.0,
            longitude: -105.0,
            difficulty: Difficulty::Hard,
            length: 4.0,
            length_km: miles_to_km(4.0),
            elevation_gain: 900.0,
            elevation: 7200.0,
            location: "Boulder".into(),
            country: "United States".into(),
            state_province: Some("CO".into()),
            surface: None,
            trail_type: None,
            tags: vec!["hiking".into()],
            source: TrailSource::Usgs,
            source_id: "abc".into(),
            geojson: None,
            is_age_restricted: false,
        }
    }

    #[rstest]
    fn conversions_invert() {
        assert!((km_to_miles(miles_to_km(7.5)) - 7.5).abs() < 1e-12);
    }

    #[rstest]
    fn coordinate_uses_lon_lat_order(normalized: NormalizedTrail) {
        let coord = normalized.coordinate();
        assert_eq!(coord.x, -105.0);
        assert_eq!(coord.y, 40.0);
    }

    #[rstest]
    fn catalogued_trail_starts_unverified(normalized: NormalizedTrail) {
        let trail = Trail::from_normalized(&normalized);
        assert_eq!(trail.id, "usgs-abc");
        assert_eq!(trail.difficulty, Difficulty::Hard);
        assert!(!trail.is_verified);
        assert_eq!(trail.tags, vec!["hiking".to_owned()]);
    }

    #[rstest]
    fn serializes_snake_case_source(normalized: NormalizedTrail) {
        let value = serde_json::to_value(&normalized).unwrap();
        assert_eq!(value["source"], "usgs");
        assert_eq!(value["difficulty"], "hard");
        assert_eq!(value["is_age_restricted"], false);
    }
}
