//! USGS-shaped trail records (miles and feet).

use greentrails_core::{Difficulty, NormalizedTrail, TrailSource, miles_to_km};
use serde::Deserialize;

use super::{id_string, lenient_f64, lenient_string, name_or_placeholder};
use crate::tags::TagSet;

/// One record in the USGS trail schema.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct UsgsTrail {
    /// Provider identifier.
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    /// Trail name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Free-text description.
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    /// Trailhead latitude.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    /// Trailhead longitude.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    /// Difficulty in plain words.
    #[serde(default, deserialize_with = "lenient_string")]
    pub difficulty: Option<String>,
    /// Length in miles.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub length_miles: Option<f64>,
    /// Total ascent in feet.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub elevation_gain_ft: Option<f64>,
    /// Highest point in feet.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub max_elevation_ft: Option<f64>,
    /// State code, copied verbatim.
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
    /// Place description.
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    /// Surface type.
    #[serde(default, deserialize_with = "lenient_string")]
    pub surface: Option<String>,
    /// Trail classification.
    #[serde(default, deserialize_with = "lenient_string")]
    pub trail_type: Option<String>,
}

impl UsgsTrail {
    /// Map the record onto the shared trail shape.
    #[must_use]
    pub fn normalize(&self) -> NormalizedTrail {
        let source = TrailSource::Usgs;
        let length = self.length_miles.unwrap_or(0.0);
        NormalizedTrail {
            id: source.trail_id(&self.id),
            name: name_or_placeholder(self.name.as_deref(), &self.id),
            description: self.description.clone(),
            latitude: self.latitude.unwrap_or(0.0),
            longitude: self.longitude.unwrap_or(0.0),
            difficulty: Difficulty::standardize(self.difficulty.as_deref()),
            length,
            length_km: miles_to_km(length),
            elevation_gain: self.elevation_gain_ft.unwrap_or(0.0),
            elevation: self.max_elevation_ft.unwrap_or(0.0),
            location: self
                .location
                .as_ref()
                .or(self.state.as_ref())
                .cloned()
                .unwrap_or_else(|| "Unknown".to_owned()),
            country: "United States".to_owned(),
            state_province: self.state.clone(),
            surface: self.surface.clone(),
            trail_type: self.trail_type.clone(),
            tags: self.tags(),
            source,
            source_id: self.id.clone(),
            geojson: None,
            is_age_restricted: false,
        }
    }

    /// USGS records only receive the generic tags.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        TagSet::default().finish()
    }
}
