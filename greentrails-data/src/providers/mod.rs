//! Provider record shapes and their normalizers.
//!
//! Each provider module owns one serde shape and maps it onto
//! [`NormalizedTrail`]. Provider fields are decoded leniently: numbers may
//! arrive as JSON numbers or numeric strings, and anything unusable falls
//! back to the documented default instead of failing the record.

use std::collections::BTreeMap;

use greentrails_core::{NormalizedTrail, TrailSource};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::NormalizeError;

pub mod hiking_project;
pub mod osm;
pub mod usgs;

pub use hiking_project::HikingProjectTrail;
pub use osm::{OsmCenter, OsmElement};
pub use usgs::UsgsTrail;

/// A provider record tagged with its provider.
///
/// Dispatch is an exhaustive `match`, so adding a provider is a
/// compile-time-checked change.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTrail {
    /// A Hiking Project `get-trails` entry.
    HikingProject(HikingProjectTrail),
    /// An Overpass way or relation element.
    OpenStreetMap(OsmElement),
    /// A USGS-shaped record.
    Usgs(UsgsTrail),
}

impl RawTrail {
    /// Decode a JSON record for `source`.
    ///
    /// # Errors
    /// Returns [`NormalizeError::Decode`] when the payload is not an object of
    /// the provider's shape.
    pub fn from_value(source: TrailSource, value: &Value) -> Result<Self, NormalizeError> {
        let decode_error = |err: serde_json::Error| NormalizeError::Decode {
            provider: source,
            source: err,
        };
        match source {
            TrailSource::HikingProject => HikingProjectTrail::deserialize(value)
                .map(Self::HikingProject)
                .map_err(decode_error),
            TrailSource::OpenStreetMap => OsmElement::deserialize(value)
                .map(Self::OpenStreetMap)
                .map_err(decode_error),
            TrailSource::Usgs => UsgsTrail::deserialize(value)
                .map(Self::Usgs)
                .map_err(decode_error),
        }
    }

    /// Provider this record came from.
    #[must_use]
    pub const fn source(&self) -> TrailSource {
        match self {
            Self::HikingProject(_) => TrailSource::HikingProject,
            Self::OpenStreetMap(_) => TrailSource::OpenStreetMap,
            Self::Usgs(_) => TrailSource::Usgs,
        }
    }

    /// Map the record onto the shared trail shape.
    ///
    /// `additional` carries out-of-band provider data; only OpenStreetMap
    /// uses it, as the geometry to pass through.
    #[must_use]
    pub fn normalize(&self, additional: Option<&Value>) -> NormalizedTrail {
        match self {
            Self::HikingProject(trail) => trail.normalize(),
            Self::OpenStreetMap(element) => element.normalize(additional),
            Self::Usgs(trail) => trail.normalize(),
        }
    }

    /// Derive descriptive tags from the record.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        match self {
            Self::HikingProject(trail) => trail.tags(),
            Self::OpenStreetMap(element) => element.tags(),
            Self::Usgs(trail) => trail.tags(),
        }
    }
}

/// Accept string or numeric identifiers; absent or null ids become empty.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Accept finite numbers and numeric strings; anything else is treated as
/// absent.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|number| number.is_finite()))
}

/// Decode a tag object, rendering scalar values as text.
///
/// Nested values are dropped and anything other than an object yields no
/// tags.
pub(crate) fn lenient_tags<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                _ => return None,
            };
            Some((key, text))
        })
        .collect())
}

/// Accept strings and render scalars as text; empty strings count as absent.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) if !text.trim().is_empty() => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    })
}

/// Fall back to `Trail {id}` when a provider omits the name.
pub(crate) fn name_or_placeholder(name: Option<&str>, source_id: &str) -> String {
    name.map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(|| format!("Trail {source_id}"), str::to_owned)
}
