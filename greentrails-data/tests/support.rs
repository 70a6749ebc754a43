//! Shared helpers for behavioural tests.

use camino::Utf8PathBuf;
use serde_json::Value;

/// Directory holding JSON fixtures for this crate.
pub fn fixtures_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Load the raw records stored in fixture `name`.
pub fn load_fixture(name: &str) -> Vec<Value> {
    let path = fixtures_dir().join(name);
    greentrails_data::load_raw_records(&path).unwrap_or_else(|err| {
        panic!("failed to load fixture {path}: {err}");
    })
}
