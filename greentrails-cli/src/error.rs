//! Error types emitted by the GreenTrails CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use greentrails_core::UnknownSourceError;
use greentrails_data::{LoadRecordsError, PersistTrailsError};
use greentrails_scorer::ScoreWeightsError;
use thiserror::Error;

/// Errors emitted by the GreenTrails CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The provider name is not recognised.
    #[error(transparent)]
    UnknownSource(#[from] UnknownSourceError),
    /// A numeric option must be at least one.
    #[error("--{field} must be at least 1")]
    ZeroValue {
        /// Flag name of the offending option.
        field: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag name of the path option.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag name of the path option.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag name of the path option.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Raw provider records could not be loaded.
    #[error(transparent)]
    LoadRecords(#[from] LoadRecordsError),
    /// The trail database could not be opened or queried.
    #[error("trail store {path:?} failed: {source}")]
    TrailStore {
        /// Database path.
        path: Utf8PathBuf,
        /// Store failure.
        #[source]
        source: PersistTrailsError,
    },
    /// Opening a JSON input file failed.
    #[error("failed to open {field} at {path:?}: {source}")]
    OpenInput {
        /// Flag name of the path option.
        field: &'static str,
        /// Path that failed to open.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// A JSON input file could not be decoded.
    #[error("failed to parse {field} JSON at {path:?}: {source}")]
    ParseInput {
        /// Flag name of the path option.
        field: &'static str,
        /// Path that failed to decode.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// Configured score weights are unusable.
    #[error("invalid score weights in {path:?}: {source}")]
    InvalidWeights {
        /// Weights file.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: ScoreWeightsError,
    },
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
