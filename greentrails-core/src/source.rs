//! External trail data providers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A provider whose record format the normalizers accept.
///
/// # Examples
/// ```
/// use greentrails_core::TrailSource;
///
/// let source: TrailSource = "osm".parse().unwrap();
/// assert_eq!(source, TrailSource::OpenStreetMap);
/// assert_eq!(source.trail_id("998"), "osm-998");
/// assert!("bogus_source".parse::<TrailSource>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailSource {
    /// The Hiking Project REST API.
    HikingProject,
    /// OpenStreetMap elements fetched through Overpass.
    #[serde(rename = "openstreetmap")]
    OpenStreetMap,
    /// USGS-shaped trail records.
    Usgs,
}

/// Raised when a source name does not name a known provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown trail data source: {name}")]
pub struct UnknownSourceError {
    /// The rejected source name.
    pub name: String,
}

impl TrailSource {
    /// Return the canonical source name stored alongside normalized trails.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HikingProject => "hiking_project",
            Self::OpenStreetMap => "openstreetmap",
            Self::Usgs => "usgs",
        }
    }

    /// Return the prefix used to build trail identifiers.
    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::HikingProject => "hp",
            Self::OpenStreetMap => "osm",
            Self::Usgs => "usgs",
        }
    }

    /// Build the provider-prefixed trail identifier for `source_id`.
    #[must_use]
    pub fn trail_id(self, source_id: &str) -> String {
        format!("{}-{source_id}", self.id_prefix())
    }
}

impl std::fmt::Display for TrailSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrailSource {
    type Err = UnknownSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hiking_project" | "hikingproject" | "hp" => Ok(Self::HikingProject),
            "openstreetmap" | "osm" => Ok(Self::OpenStreetMap),
            "usgs" => Ok(Self::Usgs),
            _ => Err(UnknownSourceError { name: s.to_owned() }),
        }
    }
}
