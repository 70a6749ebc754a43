//! Test helpers for staging CLI inputs in a temporary workspace.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

use crate::import::{ImportArgs, run_import_with};

/// Two USGS records: an easy loop and a moderate ridge walk.
pub(super) const USGS_RECORDS: &str = r#"[
    {"id": "a1", "name": "Canal Loop", "difficulty": "easy", "length_miles": 1.5, "state": "CO",
     "latitude": 39.7, "longitude": -105.0},
    {"id": "b2", "name": "Ridge Walk", "difficulty": "moderate", "length_miles": 5.0, "state": "CO",
     "latitude": 40.0, "longitude": -105.3}
]"#;

/// A user who prefers moderate trails, anchored at a fixed instant.
pub(super) const MODERATE_CONTEXT: &str = r#"{
    "preferences": {"preferred_difficulty": "moderate"},
    "now": "2026-10-16T09:00:00Z"
}"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test input");
}

/// A temporary directory addressed by UTF-8 paths.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write `contents` under `name` and return the full path.
    pub(super) fn file(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents.as_bytes());
        path
    }

    /// Import [`USGS_RECORDS`] into `trails.db` and return the database path.
    pub(super) fn imported_catalogue(&self) -> Utf8PathBuf {
        let input = self.file("usgs.json", USGS_RECORDS);
        let database = self.path("trails.db");
        let args = ImportArgs {
            source: Some("usgs".to_owned()),
            input: Some(input),
            database: Some(database.clone()),
            batch_size: None,
        };
        let mut sink = Vec::new();
        run_import_with(args, &mut sink).expect("import catalogue");
        database
    }
}
