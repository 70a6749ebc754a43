//! Command-line interface for GreenTrails import and recommendation.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};

mod error;
mod import;
mod recommend;

pub use error::CliError;

use import::{ImportArgs, run_import};
use recommend::{RecommendArgs, run_recommend};

pub(crate) const ARG_IMPORT_SOURCE: &str = "source";
pub(crate) const ARG_IMPORT_INPUT: &str = "input";
pub(crate) const ARG_IMPORT_DATABASE: &str = "database";
pub(crate) const ARG_IMPORT_BATCH_SIZE: &str = "batch-size";
pub(crate) const ENV_IMPORT_SOURCE: &str = "GREENTRAILS_CMDS_IMPORT_SOURCE";
pub(crate) const ENV_IMPORT_INPUT: &str = "GREENTRAILS_CMDS_IMPORT_INPUT";

pub(crate) const ARG_RECOMMEND_DATABASE: &str = "database";
pub(crate) const ARG_RECOMMEND_CONTEXT: &str = "context";
pub(crate) const ARG_RECOMMEND_WEIGHTS: &str = "weights";
pub(crate) const ARG_RECOMMEND_LIMIT: &str = "limit";
pub(crate) const ENV_RECOMMEND_CONTEXT: &str = "GREENTRAILS_CMDS_RECOMMEND_CONTEXT";

/// Database file used when no `--database` is configured.
pub(crate) const DEFAULT_DATABASE: &str = "greentrails.db";

/// Run the GreenTrails CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration, inputs or the
/// underlying import or ranking fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Import(args) => run_import(args),
        Command::Recommend(args) => run_recommend(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "greentrails",
    about = "Trail import and recommendation utilities for GreenTrails",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize raw provider records and store them in SQLite.
    Import(ImportArgs),
    /// Rank stored trails for a user context.
    Recommend(RecommendArgs),
}

/// Check that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match greentrails_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T>(writer: &mut dyn std::io::Write, value: &T) -> Result<(), CliError>
where
    T: serde::Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
