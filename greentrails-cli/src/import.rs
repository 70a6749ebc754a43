//! Import command implementation for the GreenTrails CLI.

use std::io::Write;
use std::num::NonZeroUsize;

use camino::Utf8PathBuf;
use clap::Parser;
use greentrails_core::TrailSource;
use greentrails_data::{ImportOptions, ImportReport, SqliteTrailStore, import_trails};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_IMPORT_BATCH_SIZE, ARG_IMPORT_DATABASE, ARG_IMPORT_INPUT, ARG_IMPORT_SOURCE, CliError,
    DEFAULT_DATABASE, ENV_IMPORT_INPUT, ENV_IMPORT_SOURCE, require_existing, write_json,
};

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Normalize a JSON file of raw provider records and write \
                 the trails into a SQLite database in batches. Options can \
                 come from CLI flags, configuration files, or environment \
                 variables.",
    about = "Import raw provider records into the trail store"
)]
#[ortho_config(prefix = "GREENTRAILS")]
pub(crate) struct ImportArgs {
    /// Provider the records come from (`hiking_project`, `osm`, `usgs`).
    #[arg(long = ARG_IMPORT_SOURCE, value_name = "provider")]
    #[serde(default)]
    pub(crate) source: Option<String>,
    /// JSON file holding the raw records.
    #[arg(long = ARG_IMPORT_INPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// SQLite database to write; created when missing.
    #[arg(long = ARG_IMPORT_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Trails written per transaction.
    #[arg(long = ARG_IMPORT_BATCH_SIZE, value_name = "count")]
    #[serde(default)]
    pub(crate) batch_size: Option<usize>,
}

impl ImportArgs {
    pub(crate) fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportConfig::try_from(merged)
    }
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    pub(crate) source: TrailSource,
    pub(crate) input: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
    pub(crate) batch_size: NonZeroUsize,
}

impl ImportConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.input, ARG_IMPORT_INPUT)
    }

    const fn options(&self) -> ImportOptions {
        ImportOptions {
            batch_size: self.batch_size,
        }
    }
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let source = args.source.ok_or(CliError::MissingArgument {
            field: ARG_IMPORT_SOURCE,
            env: ENV_IMPORT_SOURCE,
        })?;
        let source: TrailSource = source.parse()?;
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_IMPORT_INPUT,
            env: ENV_IMPORT_INPUT,
        })?;
        let database = args
            .database
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE));
        let batch_size = match args.batch_size {
            None => ImportOptions::default().batch_size,
            Some(size) => NonZeroUsize::new(size).ok_or(CliError::ZeroValue {
                field: ARG_IMPORT_BATCH_SIZE,
            })?,
        };
        Ok(Self {
            source,
            input,
            database,
            batch_size,
        })
    }
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_import_with(args, &mut stdout)
}

pub(crate) fn run_import_with(args: ImportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let report = execute_import(args)?;
    write_json(writer, &report)
}

fn execute_import(args: ImportArgs) -> Result<ImportReport, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;

    let records = greentrails_data::load_raw_records(&config.input)?;
    info!(
        "Importing {} {} records from {}",
        records.len(),
        config.source,
        config.input
    );
    let mut store =
        SqliteTrailStore::open(&config.database).map_err(|source| CliError::TrailStore {
            path: config.database.clone(),
            source,
        })?;
    Ok(import_trails(
        config.source,
        &records,
        &mut store,
        config.options(),
    ))
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ImportConfig, CliError> {
    let merged = ImportArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ImportConfig::try_from(merged)
}
