//! Provider normalization, batched import and SQLite persistence for
//! GreenTrails.
//!
//! Responsibilities:
//! - Decode raw Hiking Project, OpenStreetMap and USGS records.
//! - Map them onto [`NormalizedTrail`] and derive descriptive tags.
//! - Feed normalized trails to a [`TrailSink`] in fixed-size batches.
//!
//! Boundaries:
//! - No network access; records arrive as `serde_json::Value`s.
//! - Domain vocabulary lives in `greentrails-core`.
//!
//! Invariants:
//! - Normalization never yields a partial record: it either returns a full
//!   [`NormalizedTrail`] or a [`NormalizeError`].
//! - No global mutable state.
//!
//! [`TrailSink`]: greentrails_core::TrailSink

#![forbid(unsafe_code)]

use greentrails_core::{NormalizedTrail, TrailSource, UnknownSourceError};
use serde_json::Value;
use thiserror::Error;

pub mod import;
pub mod load;
pub mod providers;
pub mod store;
mod tags;

pub use import::{ImportOptions, ImportReport, import_trails};
pub use load::{LoadRecordsError, load_raw_records, parse_raw_records};
pub use providers::{HikingProjectTrail, OsmCenter, OsmElement, RawTrail, UsgsTrail};
pub use store::{PersistTrailsError, SqliteTrailStore};
pub use tags::GENERIC_TAGS;

/// Errors raised while normalizing a raw provider record.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The provider name is not one of the supported sources.
    #[error(transparent)]
    UnknownSource(#[from] UnknownSourceError),
    /// The payload does not have the provider's record shape.
    #[error("malformed {provider} record")]
    Decode {
        /// Provider whose shape was expected.
        provider: TrailSource,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
}

/// Normalize one raw record named by its provider string.
///
/// `source` accepts `hiking_project`, `openstreetmap` (or `osm`) and `usgs`.
/// `additional` is provider-specific out-of-band data; OpenStreetMap treats
/// it as the geometry to store.
///
/// # Errors
/// Returns [`NormalizeError::UnknownSource`] for an unrecognised provider and
/// [`NormalizeError::Decode`] when the payload is not a record object.
///
/// # Examples
/// ```
/// use greentrails_data::normalize_trail;
/// use serde_json::json;
///
/// let trail = normalize_trail(&json!({"id": 42, "length": 3}), "hiking_project", None).unwrap();
/// assert_eq!(trail.id, "hp-42");
///
/// let err = normalize_trail(&json!({}), "bogus_source", None).unwrap_err();
/// assert_eq!(err.to_string(), "Unknown trail data source: bogus_source");
/// ```
pub fn normalize_trail(
    record: &Value,
    source: &str,
    additional: Option<&Value>,
) -> Result<NormalizedTrail, NormalizeError> {
    let source: TrailSource = source.parse()?;
    let raw = RawTrail::from_value(source, record)?;
    Ok(raw.normalize(additional))
}

/// Derive the sorted, deduplicated tag list for a decoded record.
#[must_use]
pub fn extract_tags(record: &RawTrail) -> Vec<String> {
    record.tags()
}

/// Decode `record` for the named provider and derive its tags.
///
/// # Errors
/// Fails exactly as [`normalize_trail`] does.
pub fn extract_tags_for_source(record: &Value, source: &str) -> Result<Vec<String>, NormalizeError> {
    let source: TrailSource = source.parse()?;
    RawTrail::from_value(source, record).map(|raw| extract_tags(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use greentrails_core::KM_PER_MILE;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"id": 42, "length": 4.2}), "hiking_project", "hp-42")]
    #[case(json!({"id": 998, "tags": {"distance": "3.1"}}), "openstreetmap", "osm-998")]
    #[case(json!({"id": 998}), "osm", "osm-998")]
    #[case(json!({"id": "abc", "length_miles": 2}), "usgs", "usgs-abc")]
    fn ids_carry_provider_prefix(#[case] record: Value, #[case] source: &str, #[case] id: &str) {
        let trail = normalize_trail(&record, source, None).expect("normalize");
        assert_eq!(trail.id, id);
        assert!((trail.length * KM_PER_MILE - trail.length_km).abs() < 1e-9);
    }

    #[rstest]
    fn unknown_source_is_rejected() {
        let err = normalize_trail(&json!({"id": 1}), "bogus_source", None)
            .expect_err("unknown source must fail");
        assert!(matches!(err, NormalizeError::UnknownSource(_)));
        assert!(err.to_string().starts_with("Unknown trail data source"));
    }

    #[rstest]
    fn osm_additional_data_becomes_geometry() {
        let geometry = json!({"type": "LineString", "coordinates": []});
        let trail = normalize_trail(&json!({"id": 5}), "osm", Some(&geometry)).expect("normalize");
        assert_eq!(trail.geojson, Some(geometry));
    }

    #[rstest]
    fn extracted_tags_match_normalized_tags() {
        let record = json!({"id": 3, "difficulty": "black", "stars": 4.2});
        let tags = extract_tags_for_source(&record, "hiking_project").expect("tags");
        let trail = normalize_trail(&record, "hiking_project", None).expect("normalize");
        assert_eq!(tags, trail.tags);
    }
}
