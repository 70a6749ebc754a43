//! OpenStreetMap elements as returned by the Overpass API (`out center geom`).
//!
//! Overpass reports trail attributes as free-form string tags. Distances are
//! kilometres and elevations metres, so both are converted on the way in.

use std::collections::BTreeMap;

use greentrails_core::{Difficulty, NormalizedTrail, TrailSource, km_to_miles};
use serde::Deserialize;
use serde_json::Value;

use super::{id_string, lenient_f64, lenient_tags, name_or_placeholder};
use crate::tags::TagSet;

/// Length assumed when the `distance` tag is missing, zero or unparsable.
pub const DEFAULT_LENGTH_KM: f64 = 5.0;

/// Elevation gain reported for every OpenStreetMap trail, in feet.
pub const DEFAULT_ELEVATION_GAIN_FT: f64 = 200.0;

const FEET_PER_METRE: f64 = 3.280_84;

/// OSM `sac_scale` values and the SAC codes they stand for.
const SAC_SCALE_CODES: [(&str, &str); 6] = [
    ("hiking", "T1"),
    ("mountain_hiking", "T2"),
    ("demanding_mountain_hiking", "T3"),
    ("alpine_hiking", "T4"),
    ("demanding_alpine_hiking", "T5"),
    ("difficult_alpine_hiking", "T6"),
];

/// Centre point Overpass attaches to ways and relations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct OsmCenter {
    /// Latitude.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    /// Longitude.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
}

/// One Overpass element describing a trail.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OsmElement {
    /// OSM object identifier.
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    /// Latitude, present on nodes.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    /// Longitude, present on nodes.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
    /// Centre of a way or relation.
    #[serde(default)]
    pub center: Option<OsmCenter>,
    /// Key/value tags; numeric and boolean values are kept as text.
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: BTreeMap<String, String>,
    /// Geometry as delivered, typically a list of `{lat, lon}` points.
    #[serde(default)]
    pub geometry: Option<Value>,
}

impl OsmElement {
    fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Difficulty text, preferring the SAC scale over a free-text tag.
    fn difficulty_label(&self) -> Option<&str> {
        self.tag("sac_scale")
            .map(|scale| {
                SAC_SCALE_CODES
                    .iter()
                    .find(|(name, _)| scale.eq_ignore_ascii_case(name))
                    .map_or(scale, |(_, code)| *code)
            })
            .or_else(|| self.tag("difficulty"))
    }

    /// Trailhead as `(latitude, longitude)`.
    fn position(&self, geometry: Option<&Value>) -> (f64, f64) {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return (lat, lon);
        }
        if let Some(OsmCenter {
            lat: Some(lat),
            lon: Some(lon),
        }) = self.center
        {
            return (lat, lon);
        }
        geometry
            .and_then(|geometry| geometry.get(0))
            .and_then(|point| {
                let lat = point.get("lat").and_then(Value::as_f64)?;
                let lon = point.get("lon").and_then(Value::as_f64)?;
                Some((lat, lon))
            })
            .unwrap_or((0.0, 0.0))
    }

    fn length_km(&self) -> f64 {
        self.tag("distance")
            .and_then(leading_number)
            .filter(|km| *km != 0.0)
            .unwrap_or(DEFAULT_LENGTH_KM)
    }

    /// Map the element onto the shared trail shape.
    ///
    /// `additional` replaces the element's own geometry when supplied.
    ///
    /// # Examples
    /// ```
    /// use greentrails_core::Difficulty;
    /// use greentrails_data::OsmElement;
    ///
    /// let element: OsmElement = serde_json::from_value(serde_json::json!({
    ///     "id": 998,
    ///     "tags": {}
    /// }))
    /// .unwrap();
    /// let trail = element.normalize(None);
    /// assert_eq!(trail.id, "osm-998");
    /// assert_eq!(trail.name, "Trail 998");
    /// assert_eq!(trail.difficulty, Difficulty::Moderate);
    /// assert_eq!(trail.length_km, 5.0);
    /// ```
    #[must_use]
    pub fn normalize(&self, additional: Option<&Value>) -> NormalizedTrail {
        let source = TrailSource::OpenStreetMap;
        let geometry = additional.or(self.geometry.as_ref());
        let (latitude, longitude) = self.position(geometry);
        let length_km = self.length_km();
        NormalizedTrail {
            id: source.trail_id(&self.id),
            name: name_or_placeholder(self.tag("name"), &self.id),
            description: self.tag("description").map(str::to_owned),
            latitude,
            longitude,
            difficulty: Difficulty::standardize(self.difficulty_label()),
            length: km_to_miles(length_km),
            length_km,
            elevation_gain: DEFAULT_ELEVATION_GAIN_FT,
            elevation: self
                .tag("ele")
                .and_then(leading_number)
                .map_or(0.0, |metres| metres * FEET_PER_METRE),
            location: self
                .tag("is_in")
                .or_else(|| self.tag("addr:city"))
                .unwrap_or("Unknown")
                .to_owned(),
            country: "Unknown".to_owned(),
            state_province: None,
            surface: self.tag("surface").map(str::to_owned),
            trail_type: self
                .tag("route")
                .or_else(|| self.tag("highway"))
                .map(str::to_owned),
            tags: self.tags(),
            source,
            source_id: self.id.clone(),
            geojson: geometry.cloned(),
            is_age_restricted: false,
        }
    }

    /// Derive `surface-`, `visibility-` and `sac-` tags plus the generic set.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let mut tags = TagSet::default();
        tags.insert_prefixed("surface", self.tag("surface"));
        tags.insert_prefixed(
            "visibility",
            self.tag("trail_visibility").or_else(|| self.tag("visibility")),
        );
        tags.insert_prefixed("sac", self.tag("sac_scale"));
        tags.finish()
    }
}

/// Parse the numeric prefix of a tag value such as `12.5 km`.
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|&(index, ch)| {
            !(ch.is_ascii_digit() || ch == '.' || (index == 0 && (ch == '-' || ch == '+')))
        })
        .map_or(text.len(), |(index, _)| index);
    text.get(..end)?
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use greentrails_core::KM_PER_MILE;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn mesa() -> OsmElement {
        serde_json::from_value(json!({
            "type": "way",
            "id": 4401,
            "center": {"lat": 39.98, "lon": -105.29},
            "geometry": [
                {"lat": 39.97, "lon": -105.30},
                {"lat": 39.99, "lon": -105.28}
            ],
            "tags": {
                "name": "Mesa Trail",
                "highway": "path",
                "surface": "Gravel",
                "sac_scale": "mountain_hiking",
                "trail_visibility": "good",
                "distance": "10.9 km",
                "ele": "1800",
                "is_in": "Boulder"
            }
        }))
        .expect("decode element")
    }

    #[rstest]
    fn maps_tagged_way(mesa: OsmElement) {
        let trail = mesa.normalize(None);
        assert_eq!(trail.id, "osm-4401");
        assert_eq!(trail.name, "Mesa Trail");
        assert_eq!(trail.difficulty, Difficulty::Moderate);
        assert_eq!((trail.latitude, trail.longitude), (39.98, -105.29));
        assert_eq!(trail.length_km, 10.9);
        assert!((trail.length * KM_PER_MILE - trail.length_km).abs() < 1e-9);
        assert_eq!(trail.elevation_gain, DEFAULT_ELEVATION_GAIN_FT);
        assert!((trail.elevation - 1800.0 * FEET_PER_METRE).abs() < 1e-9);
        assert_eq!(trail.location, "Boulder");
        assert_eq!(trail.country, "Unknown");
        assert!(trail.state_province.is_none());
        assert_eq!(trail.surface.as_deref(), Some("Gravel"));
        assert_eq!(trail.trail_type.as_deref(), Some("path"));
        assert_eq!(trail.geojson, mesa.geometry);
    }

    #[rstest]
    fn empty_tags_use_defaults() {
        let element: OsmElement =
            serde_json::from_value(json!({"id": 998, "tags": {}})).expect("decode element");
        let trail = element.normalize(None);
        assert_eq!(trail.name, "Trail 998");
        assert_eq!(trail.difficulty, Difficulty::Moderate);
        assert_eq!(trail.length_km, DEFAULT_LENGTH_KM);
        assert_eq!(trail.location, "Unknown");
        assert_eq!((trail.latitude, trail.longitude), (0.0, 0.0));
        assert!(trail.geojson.is_none());
    }

    #[rstest]
    fn numeric_tag_values_are_accepted() {
        let record = json!({"id": 5, "tags": {"name": "Mesa", "ele": 1800, "distance": 3.2}});
        let trail = crate::normalize_trail(&record, "osm", None).expect("normalize element");
        assert_eq!(trail.id, "osm-5");
        assert_eq!(trail.name, "Mesa");
        assert!((trail.elevation - 1800.0 * FEET_PER_METRE).abs() < 1e-9);
        assert_eq!(trail.length_km, 3.2);
    }

    #[rstest]
    fn null_tags_use_defaults() {
        let record = json!({"id": 6, "tags": null});
        let trail = crate::normalize_trail(&record, "osm", None).expect("normalize element");
        assert_eq!(trail.name, "Trail 6");
        assert_eq!(trail.length_km, DEFAULT_LENGTH_KM);
    }

    #[rstest]
    fn additional_geometry_wins(mesa: OsmElement) {
        let replacement = json!({"type": "LineString", "coordinates": [[-105.0, 40.0]]});
        let trail = mesa.normalize(Some(&replacement));
        assert_eq!(trail.geojson, Some(replacement));
    }

    #[rstest]
    fn falls_back_to_first_geometry_point(mesa: OsmElement) {
        let element = OsmElement {
            center: None,
            ..mesa
        };
        let trail = element.normalize(None);
        assert_eq!((trail.latitude, trail.longitude), (39.97, -105.30));
    }

    #[rstest]
    #[case("hiking", Difficulty::Easy)]
    #[case("demanding_mountain_hiking", Difficulty::Moderate)]
    #[case("alpine_hiking", Difficulty::Hard)]
    #[case("difficult_alpine_hiking", Difficulty::Expert)]
    #[case("T5", Difficulty::Hard)]
    fn sac_scale_drives_difficulty(#[case] scale: &str, #[case] expected: Difficulty) {
        let element = OsmElement {
            id: "1".into(),
            tags: BTreeMap::from([("sac_scale".to_owned(), scale.to_owned())]),
            ..OsmElement::default()
        };
        assert_eq!(element.normalize(None).difficulty, expected);
    }

    #[rstest]
    #[case("12.5 km", Some(12.5))]
    #[case("  7", Some(7.0))]
    #[case("km", None)]
    #[case("", None)]
    fn parses_numeric_prefix(#[case] text: &str, #[case] expected: Option<f64>) {
        assert_eq!(leading_number(text), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("unknown")]
    fn unusable_distance_defaults(#[case] distance: &str) {
        let element = OsmElement {
            id: "2".into(),
            tags: BTreeMap::from([("distance".to_owned(), distance.to_owned())]),
            ..OsmElement::default()
        };
        assert_eq!(element.normalize(None).length_km, DEFAULT_LENGTH_KM);
    }

    #[rstest]
    fn tags_carry_prefixed_attributes(mesa: OsmElement) {
        assert_eq!(
            mesa.tags(),
            [
                "hiking",
                "nature",
                "outdoor",
                "sac-mountain_hiking",
                "surface-gravel",
                "visibility-good",
            ]
        );
    }
}
