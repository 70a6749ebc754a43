//! SQLite persistence for normalized trails.

use camino::{Utf8Path, Utf8PathBuf};
use greentrails_core::{
    Difficulty, NormalizedTrail, ParseDifficultyError, SinkError, Trail, TrailSink,
};
use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction, params};
use serde_json::to_string;
use thiserror::Error;

/// Errors raised when persisting or loading trails.
#[derive(Debug, Error)]
pub enum PersistTrailsError {
    /// Failed to create the parent directory for the SQLite artefact.
    #[error("failed to create parent directory for {path:?}")]
    CreateDirectory {
        /// Database path whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path:?}")]
    Open {
        /// Destination database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating the `trails` table failed.
    #[error("failed to create trails table")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Beginning the transaction failed.
    #[error("failed to begin trail persistence transaction")]
    BeginTransaction {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Preparing a statement failed.
    #[error("failed to prepare trail statement")]
    Prepare {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Serializing a JSON column failed.
    #[error("failed to serialize {column} for trail {trail_id}")]
    Serialize {
        /// Identifier of the trail being written.
        trail_id: String,
        /// Column being encoded.
        column: &'static str,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Writing a trail row failed.
    #[error("failed to persist trail {trail_id}")]
    PersistRow {
        /// Identifier of the trail being persisted.
        trail_id: String,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Committing the transaction failed.
    #[error("failed to commit trail persistence transaction")]
    Commit {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Reading rows back failed.
    #[error("failed to query trails")]
    Query {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A stored difficulty is not one of the four levels.
    #[error("trail {trail_id} has an invalid difficulty")]
    Difficulty {
        /// Identifier of the offending row.
        trail_id: String,
        /// Parse failure.
        #[source]
        source: ParseDifficultyError,
    },
    /// Stored tags are not a JSON string array.
    #[error("trail {trail_id} has malformed tags")]
    Tags {
        /// Identifier of the offending row.
        trail_id: String,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
}

/// A `trails` table in an on-disk SQLite database.
///
/// Each [`TrailSink::insert_batch`] call runs in its own transaction, so a
/// rejected batch leaves earlier batches in place. Re-importing an identifier
/// updates its catalogued columns and keeps the stored verification flag.
#[derive(Debug)]
pub struct SqliteTrailStore {
    connection: Connection,
    path: Utf8PathBuf,
}

impl SqliteTrailStore {
    /// Open (or create) the database at `path` and initialise the schema.
    ///
    /// Parent directories are created automatically.
    ///
    /// # Errors
    /// Returns [`PersistTrailsError`] when the directory, database or schema
    /// cannot be created.
    pub fn open(path: &Utf8Path) -> Result<Self, PersistTrailsError> {
        greentrails_fs::ensure_parent_dir(path).map_err(|source| {
            PersistTrailsError::CreateDirectory {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| PersistTrailsError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        create_schema(&connection)?;
        Ok(Self {
            connection,
            path: path.to_path_buf(),
        })
    }

    /// Location of the database file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Write `trails` in a single transaction.
    ///
    /// # Errors
    /// Returns [`PersistTrailsError`] when any row fails; the transaction is
    /// rolled back and nothing from `trails` is kept.
    pub fn persist(&mut self, trails: &[NormalizedTrail]) -> Result<usize, PersistTrailsError> {
        let transaction = self
            .connection
            .transaction()
            .map_err(|source| PersistTrailsError::BeginTransaction { source })?;
        let written = persist_rows(&transaction, trails)?;
        transaction
            .commit()
            .map_err(|source| PersistTrailsError::Commit { source })?;
        Ok(written)
    }

    /// Flag a trail as verified, or clear the flag.
    ///
    /// Returns `false` when no trail has that identifier.
    ///
    /// # Errors
    /// Returns [`PersistTrailsError::PersistRow`] when the update fails.
    pub fn set_verified(&self, trail_id: &str, verified: bool) -> Result<bool, PersistTrailsError> {
        self.connection
            .execute(
                "UPDATE trails SET is_verified = ?1 WHERE id = ?2",
                params![verified, trail_id],
            )
            .map(|changed| changed > 0)
            .map_err(|source| PersistTrailsError::PersistRow {
                trail_id: trail_id.to_owned(),
                source,
            })
    }

    /// Fetch one stored trail by identifier.
    ///
    /// # Errors
    /// Returns [`PersistTrailsError`] when the query fails or the row is
    /// malformed.
    pub fn load_trail(&self, trail_id: &str) -> Result<Option<Trail>, PersistTrailsError> {
        let row = self
            .connection
            .query_row(
                &format!("{SELECT_TRAILS} WHERE id = ?1"),
                [trail_id],
                StoredTrail::from_row,
            )
            .optional()
            .map_err(|source| PersistTrailsError::Query { source })?;
        row.map(StoredTrail::into_trail).transpose()
    }

    /// Load every stored trail in identifier order.
    ///
    /// # Errors
    /// Returns [`PersistTrailsError`] when the query fails or a row is
    /// malformed.
    pub fn load_trails(&self) -> Result<Vec<Trail>, PersistTrailsError> {
        let mut statement = self
            .connection
            .prepare(&format!("{SELECT_TRAILS} ORDER BY id"))
            .map_err(|source| PersistTrailsError::Prepare { source })?;
        let rows = statement
            .query_map([], StoredTrail::from_row)
            .map_err(|source| PersistTrailsError::Query { source })?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| PersistTrailsError::Query { source })?;
        rows.into_iter().map(StoredTrail::into_trail).collect()
    }
}

impl TrailSink for SqliteTrailStore {
    fn insert_batch(&mut self, batch: &[NormalizedTrail]) -> Result<usize, SinkError> {
        self.persist(batch)
            .map_err(|err| SinkError::with_source(batch.len(), err))
    }
}

const SELECT_TRAILS: &str =
    "SELECT id, name, difficulty, length, location, tags, is_verified FROM trails";

/// Raw columns read back before validation.
struct StoredTrail {
    id: String,
    name: String,
    difficulty: String,
    length: f64,
    location: String,
    tags: String,
    is_verified: bool,
}

impl StoredTrail {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            difficulty: row.get(2)?,
            length: row.get(3)?,
            location: row.get(4)?,
            tags: row.get(5)?,
            is_verified: row.get(6)?,
        })
    }

    fn into_trail(self) -> Result<Trail, PersistTrailsError> {
        let difficulty: Difficulty =
            self.difficulty
                .parse()
                .map_err(|source| PersistTrailsError::Difficulty {
                    trail_id: self.id.clone(),
                    source,
                })?;
        let tags: Vec<String> =
            serde_json::from_str(&self.tags).map_err(|source| PersistTrailsError::Tags {
                trail_id: self.id.clone(),
                source,
            })?;
        let trail = Trail::new(self.id, self.name, difficulty, self.length, self.location)
            .with_tags(tags);
        Ok(if self.is_verified {
            trail.verified()
        } else {
            trail
        })
    }
}

fn create_schema(connection: &Connection) -> Result<(), PersistTrailsError> {
    connection
        .execute(
            "CREATE TABLE IF NOT EXISTS trails (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                difficulty TEXT NOT NULL,
                length REAL NOT NULL,
                length_km REAL NOT NULL,
                elevation_gain REAL NOT NULL,
                elevation REAL NOT NULL,
                location TEXT NOT NULL,
                country TEXT NOT NULL,
                state_province TEXT,
                surface TEXT,
                trail_type TEXT,
                tags TEXT NOT NULL,
                source TEXT NOT NULL,
                source_id TEXT NOT NULL,
                geojson TEXT,
                is_age_restricted INTEGER NOT NULL,
                is_verified INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )
        .map(|_| ())
        .map_err(|source| PersistTrailsError::CreateSchema { source })
}

fn persist_rows(
    transaction: &Transaction<'_>,
    trails: &[NormalizedTrail],
) -> Result<usize, PersistTrailsError> {
    if trails.is_empty() {
        return Ok(0);
    }

    let mut statement = transaction
        .prepare(
            "INSERT INTO trails (
                id, name, description, latitude, longitude, difficulty, length,
                length_km, elevation_gain, elevation, location, country,
                state_province, surface, trail_type, tags, source, source_id,
                geojson, is_age_restricted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18, ?19, ?20)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                difficulty = excluded.difficulty,
                length = excluded.length,
                length_km = excluded.length_km,
                elevation_gain = excluded.elevation_gain,
                elevation = excluded.elevation,
                location = excluded.location,
                country = excluded.country,
                state_province = excluded.state_province,
                surface = excluded.surface,
                trail_type = excluded.trail_type,
                tags = excluded.tags,
                source = excluded.source,
                source_id = excluded.source_id,
                geojson = excluded.geojson,
                is_age_restricted = excluded.is_age_restricted",
        )
        .map_err(|source| PersistTrailsError::Prepare { source })?;

    for trail in trails {
        let serialize_error = |column: &'static str| {
            move |source: serde_json::Error| PersistTrailsError::Serialize {
                trail_id: trail.id.clone(),
                column,
                source,
            }
        };
        let tags = to_string(&trail.tags).map_err(serialize_error("tags"))?;
        let geojson = trail
            .geojson
            .as_ref()
            .map(to_string)
            .transpose()
            .map_err(serialize_error("geojson"))?;
        statement
            .execute(params![
                trail.id,
                trail.name,
                trail.description,
                trail.latitude,
                trail.longitude,
                trail.difficulty.as_str(),
                trail.length,
                trail.length_km,
                trail.elevation_gain,
                trail.elevation,
                trail.location,
                trail.country,
                trail.state_province,
                trail.surface,
                trail.trail_type,
                tags,
                trail.source.as_str(),
                trail.source_id,
                geojson,
                trail.is_age_restricted,
            ])
            .map_err(|source| PersistTrailsError::PersistRow {
                trail_id: trail.id.clone(),
                source,
            })?;
    }

    Ok(trails.len())
}
