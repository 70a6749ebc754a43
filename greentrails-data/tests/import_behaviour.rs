//! Behavioural tests for normalizing and importing provider records.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use greentrails_core::{Trail, TrailSource};
use greentrails_data::{
    ImportOptions, ImportReport, NormalizeError, SqliteTrailStore, import_trails, normalize_trail,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use tempfile::TempDir;

mod support;

use support::load_fixture;

/// Records staged by a `Given` step together with their provider.
#[derive(Debug, Default)]
struct Staged {
    source: Option<TrailSource>,
    provider_name: String,
    records: Vec<Value>,
}

/// What the `When` step produced.
#[derive(Debug, Default)]
struct Imported {
    report: Option<ImportReport>,
    stored: Vec<Trail>,
    normalized: Option<Result<greentrails_core::NormalizedTrail, NormalizeError>>,
    _dir: Option<TempDir>,
}

#[fixture]
fn staged() -> RefCell<Staged> {
    RefCell::new(Staged::default())
}

#[fixture]
fn imported() -> RefCell<Imported> {
    RefCell::new(Imported::default())
}

#[given("the Hiking Project fixture")]
fn hiking_project_fixture(#[from(staged)] staged: &RefCell<Staged>) {
    *staged.borrow_mut() = Staged {
        source: Some(TrailSource::HikingProject),
        provider_name: "hiking_project".to_owned(),
        records: load_fixture("hiking_project.json"),
    };
}

#[given("the Overpass fixture")]
fn overpass_fixture(#[from(staged)] staged: &RefCell<Staged>) {
    *staged.borrow_mut() = Staged {
        source: Some(TrailSource::OpenStreetMap),
        provider_name: "openstreetmap".to_owned(),
        records: load_fixture("overpass.json"),
    };
}

#[given("a record for the bogus_source provider")]
fn bogus_record(#[from(staged)] staged: &RefCell<Staged>) {
    *staged.borrow_mut() = Staged {
        source: None,
        provider_name: "bogus_source".to_owned(),
        records: vec![json!({"id": 1, "name": "Nowhere"})],
    };
}

#[when("I import the records into a fresh trail store")]
fn import_into_store(
    #[from(staged)] staged: &RefCell<Staged>,
    #[from(imported)] imported: &RefCell<Imported>,
) {
    let staged = staged.borrow();
    let source = staged.source.expect("a known provider was staged");
    let dir = TempDir::new().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("db/trails.db")).expect("utf-8 path");
    let mut store = SqliteTrailStore::open(&path).expect("open store");

    let report = import_trails(source, &staged.records, &mut store, ImportOptions::default());
    let stored = store.load_trails().expect("load stored trails");

    let mut imported = imported.borrow_mut();
    imported.report = Some(report);
    imported.stored = stored;
    imported._dir = Some(dir);
}

#[when("I normalize the record")]
fn normalize_staged(
    #[from(staged)] staged: &RefCell<Staged>,
    #[from(imported)] imported: &RefCell<Imported>,
) {
    let staged = staged.borrow();
    let record = staged.records.first().expect("a record was staged");
    let outcome = normalize_trail(record, &staged.provider_name, None);
    imported.borrow_mut().normalized = Some(outcome);
}

#[then("every record is stored")]
fn every_record_stored(
    #[from(staged)] staged: &RefCell<Staged>,
    #[from(imported)] imported: &RefCell<Imported>,
) {
    let expected = staged.borrow().records.len();
    let imported = imported.borrow();
    let report = imported.report.as_ref().expect("import ran");
    assert_eq!(report.records, expected);
    assert_eq!(report.inserted, expected);
    assert_eq!(report.failed_records, 0);
    assert_eq!(report.failed_batches, 0);
    assert!(report.bounds.is_some(), "imported trails should have bounds");
    assert_eq!(imported.stored.len(), expected);
}

#[then("the stored ids carry the hp prefix")]
fn ids_carry_prefix(#[from(imported)] imported: &RefCell<Imported>) {
    let imported = imported.borrow();
    for trail in &imported.stored {
        assert!(trail.id.starts_with("hp-"), "unexpected id {}", trail.id);
    }
}

#[then("the long green trail carries nine tags")]
fn long_green_trail_tags(#[from(imported)] imported: &RefCell<Imported>) {
    let imported = imported.borrow();
    let trail = imported
        .stored
        .iter()
        .find(|trail| trail.id == "hp-7002175")
        .expect("Mount Sanitas Loop stored");
    assert_eq!(trail.tags.len(), 9, "unexpected tags {:?}", trail.tags);
    for tag in [
        "beginner-friendly",
        "highly-rated",
        "popular",
        "long-distance",
        "steep",
        "high-altitude",
        "hiking",
        "outdoor",
        "nature",
    ] {
        assert!(trail.tags.iter().any(|t| t == tag), "missing tag {tag}");
    }
}

#[then("the untagged element is named after its id")]
fn untagged_element_named(#[from(imported)] imported: &RefCell<Imported>) {
    let imported = imported.borrow();
    let trail = imported
        .stored
        .iter()
        .find(|trail| trail.id == "osm-998")
        .expect("untagged element stored");
    assert_eq!(trail.name, "Trail 998");
    assert_eq!(trail.difficulty.as_str(), "moderate");
    assert!((trail.length * greentrails_core::KM_PER_MILE - 5.0).abs() < 1e-9);
}

#[then("an unknown source error is returned")]
fn unknown_source_error(#[from(imported)] imported: &RefCell<Imported>) {
    let imported = imported.borrow();
    match imported.normalized.as_ref().expect("normalization ran") {
        Ok(trail) => panic!("expected an error, got {trail:?}"),
        Err(NormalizeError::UnknownSource(err)) => {
            assert_eq!(err.to_string(), "Unknown trail data source: bogus_source");
        }
        Err(other) => panic!("expected an unknown source error, got {other:?}"),
    }
}

#[scenario(path = "tests/features/import_trails.feature", index = 0)]
fn importing_hiking_project(staged: RefCell<Staged>, imported: RefCell<Imported>) {
    let _ = (staged, imported);
}

#[scenario(path = "tests/features/import_trails.feature", index = 1)]
fn importing_overpass(staged: RefCell<Staged>, imported: RefCell<Imported>) {
    let _ = (staged, imported);
}

#[scenario(path = "tests/features/import_trails.feature", index = 2)]
fn rejecting_unknown_provider(staged: RefCell<Staged>, imported: RefCell<Imported>) {
    let _ = (staged, imported);
}
