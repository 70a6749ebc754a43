//! Recommend command implementation for the GreenTrails CLI.

use std::io::{BufReader, Write};
use std::num::NonZeroUsize;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use greentrails_core::UserContext;
use greentrails_data::{PersistTrailsError, SqliteTrailStore};
use greentrails_fs::open_utf8_file;
use greentrails_scorer::{RecommendationScorer, ScoreWeights, ScoredTrail, recommend};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{
    ARG_RECOMMEND_CONTEXT, ARG_RECOMMEND_DATABASE, ARG_RECOMMEND_LIMIT, ARG_RECOMMEND_WEIGHTS,
    CliError, DEFAULT_DATABASE, ENV_RECOMMEND_CONTEXT, require_existing, write_json,
};

/// Number of trails returned when no `--limit` is configured.
pub(crate) const DEFAULT_LIMIT: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(limit) => limit,
    None => NonZeroUsize::MIN,
};

/// CLI arguments for the `recommend` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score every stored trail against a JSON-encoded user \
                 context (preferences, interactions and likes) and print \
                 the best matches as JSON.",
    about = "Rank stored trails for a user"
)]
#[ortho_config(prefix = "GREENTRAILS")]
pub(crate) struct RecommendArgs {
    /// JSON file containing the user context.
    #[arg(long = ARG_RECOMMEND_CONTEXT, value_name = "path")]
    #[serde(default)]
    pub(crate) context: Option<Utf8PathBuf>,
    /// SQLite database populated by `import`.
    #[arg(long = ARG_RECOMMEND_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Optional JSON file overriding score weights.
    #[arg(long = ARG_RECOMMEND_WEIGHTS, value_name = "path")]
    #[serde(default)]
    pub(crate) weights: Option<Utf8PathBuf>,
    /// Maximum number of trails to print.
    #[arg(long = ARG_RECOMMEND_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

impl RecommendArgs {
    pub(crate) fn into_config(self) -> Result<RecommendConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecommendConfig::try_from(merged)
    }
}

/// Resolved `recommend` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecommendConfig {
    pub(crate) context: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
    pub(crate) weights: Option<Utf8PathBuf>,
    pub(crate) limit: NonZeroUsize,
}

impl RecommendConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.context, ARG_RECOMMEND_CONTEXT)?;
        require_existing(&self.database, ARG_RECOMMEND_DATABASE)?;
        if let Some(weights) = &self.weights {
            require_existing(weights, ARG_RECOMMEND_WEIGHTS)?;
        }
        Ok(())
    }
}

impl TryFrom<RecommendArgs> for RecommendConfig {
    type Error = CliError;

    fn try_from(args: RecommendArgs) -> Result<Self, Self::Error> {
        let context = args.context.ok_or(CliError::MissingArgument {
            field: ARG_RECOMMEND_CONTEXT,
            env: ENV_RECOMMEND_CONTEXT,
        })?;
        let database = args
            .database
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE));
        let limit = match args.limit {
            None => DEFAULT_LIMIT,
            Some(limit) => NonZeroUsize::new(limit).ok_or(CliError::ZeroValue {
                field: ARG_RECOMMEND_LIMIT,
            })?,
        };
        Ok(Self {
            context,
            database,
            weights: args.weights,
            limit,
        })
    }
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_recommend_with(args, &mut stdout)
}

pub(crate) fn run_recommend_with(
    args: RecommendArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let ranked = execute_recommend(args)?;
    write_json(writer, &ranked)
}

fn execute_recommend(args: RecommendArgs) -> Result<Vec<ScoredTrail>, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;

    let context: UserContext = load_json(&config.context, ARG_RECOMMEND_CONTEXT)?;
    let scorer = build_scorer(config.weights.as_deref())?;
    let store_error = |source: PersistTrailsError| CliError::TrailStore {
        path: config.database.clone(),
        source,
    };
    let trails = SqliteTrailStore::open(&config.database)
        .and_then(|store| store.load_trails())
        .map_err(store_error)?;
    info!(
        "Ranking {} trails from {} for {}",
        trails.len(),
        config.database,
        config.context
    );
    Ok(recommend(&scorer, trails, &context, config.limit.get()))
}

fn build_scorer(weights: Option<&Utf8Path>) -> Result<RecommendationScorer, CliError> {
    let Some(path) = weights else {
        return Ok(RecommendationScorer::default());
    };
    let weights: ScoreWeights = load_json(path, ARG_RECOMMEND_WEIGHTS)?;
    RecommendationScorer::new(weights).map_err(|source| CliError::InvalidWeights {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode a JSON document from disk.
pub(crate) fn load_json<T>(path: &Utf8Path, field: &'static str) -> Result<T, CliError>
where
    T: DeserializeOwned,
{
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        field,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseInput {
        field,
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RecommendConfig, CliError> {
    let merged = RecommendArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RecommendConfig::try_from(merged)
}
