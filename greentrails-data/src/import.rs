//! Batched import of raw provider records into a [`TrailSink`].
//!
//! Records are normalized one by one; anything that fails is logged and
//! skipped. Normalized trails are then handed to the sink in fixed-size
//! batches, sequentially. A batch the sink rejects is counted and the import
//! moves on to the next one.

use std::num::NonZeroUsize;

use geo::{Coord, Rect};
use greentrails_core::{NormalizedTrail, TrailSink, TrailSource};
use log::{info, warn};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::RawTrail;

/// Batch size used when none is configured.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(50) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Tuning for [`import_trails`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Trails per sink call.
    pub batch_size: NonZeroUsize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ImportOptions {
    /// Replace the batch size while returning `self` for chaining.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Outcome of an import run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ImportReport {
    /// Provider the records came from.
    pub source: Option<TrailSource>,
    /// Raw records seen.
    pub records: usize,
    /// Records that normalized successfully.
    pub normalized: usize,
    /// Records skipped because they could not be decoded.
    pub failed_records: usize,
    /// Rows the sink reported as written.
    pub inserted: usize,
    /// Batches the sink rejected.
    pub failed_batches: usize,
    /// Bounding box of inserted trailheads, `x = longitude`, `y = latitude`.
    #[serde(serialize_with = "serialize_bounds")]
    pub bounds: Option<Rect<f64>>,
}

impl ImportReport {
    fn include_trail(&mut self, trail: &NormalizedTrail) {
        let coordinate = trail.coordinate();
        if !(coordinate.x.is_finite() && coordinate.y.is_finite()) {
            return;
        }
        match &mut self.bounds {
            Some(existing) => {
                let min = Coord {
                    x: existing.min().x.min(coordinate.x),
                    y: existing.min().y.min(coordinate.y),
                };
                let max = Coord {
                    x: existing.max().x.max(coordinate.x),
                    y: existing.max().y.max(coordinate.y),
                };
                *existing = Rect::new(min, max);
            }
            None => self.bounds = Some(Rect::new(coordinate, coordinate)),
        }
    }
}

/// Render bounds as `[min_lon, min_lat, max_lon, max_lat]`.
fn serialize_bounds<S>(bounds: &Option<Rect<f64>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    bounds
        .map(|rect| [rect.min().x, rect.min().y, rect.max().x, rect.max().y])
        .serialize(serializer)
}

/// Normalize `records` from `source` and write them to `sink` in batches.
///
/// # Examples
/// ```
/// use greentrails_core::{NormalizedTrail, SinkError, TrailSink, TrailSource};
/// use greentrails_data::{ImportOptions, import_trails};
/// use serde_json::json;
///
/// #[derive(Default)]
/// struct Collect(Vec<NormalizedTrail>);
///
/// impl TrailSink for Collect {
///     fn insert_batch(&mut self, batch: &[NormalizedTrail]) -> Result<usize, SinkError> {
///         self.0.extend_from_slice(batch);
///         Ok(batch.len())
///     }
/// }
///
/// let records = [json!({"id": 1}), json!({"id": 2})];
/// let mut sink = Collect::default();
/// let report = import_trails(TrailSource::Usgs, &records, &mut sink, ImportOptions::default());
/// assert_eq!(report.inserted, 2);
/// assert_eq!(sink.0[1].id, "usgs-2");
/// ```
pub fn import_trails<S>(
    source: TrailSource,
    records: &[Value],
    mut sink: S,
    options: ImportOptions,
) -> ImportReport
where
    S: TrailSink,
{
    let mut report = ImportReport {
        source: Some(source),
        records: records.len(),
        ..ImportReport::default()
    };

    let trails: Vec<NormalizedTrail> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match RawTrail::from_value(source, record) {
            Ok(raw) => Some(raw.normalize(None)),
            Err(err) => {
                warn!("Skipped {source} record {index}: {err}");
                None
            }
        })
        .collect();
    report.normalized = trails.len();
    report.failed_records = records.len() - trails.len();

    for (batch_index, batch) in trails.chunks(options.batch_size.get()).enumerate() {
        match sink.insert_batch(batch) {
            Ok(inserted) => {
                report.inserted += inserted;
                for trail in batch {
                    report.include_trail(trail);
                }
            }
            Err(err) => {
                warn!(
                    "Batch {batch_index} of {} trails failed: {err}",
                    batch.len()
                );
                report.failed_batches += 1;
            }
        }
    }

    info!(
        "Imported {} of {} {source} records ({} skipped, {} failed batches)",
        report.inserted, report.records, report.failed_records, report.failed_batches
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use greentrails_core::SinkError;
    use rstest::{fixture, rstest};
    use serde_json::json;

    /// Records every batch and rejects the ones whose index is listed.
    #[derive(Debug, Default)]
    struct ScriptedSink {
        batches: Vec<Vec<String>>,
        reject: Vec<usize>,
    }

    impl TrailSink for ScriptedSink {
        fn insert_batch(&mut self, batch: &[NormalizedTrail]) -> Result<usize, SinkError> {
            let index = self.batches.len();
            self.batches
                .push(batch.iter().map(|trail| trail.id.clone()).collect());
            if self.reject.contains(&index) {
                return Err(SinkError::new(batch.len(), "constraint violation"));
            }
            Ok(batch.len())
        }
    }

    #[fixture]
    fn records() -> Vec<Value> {
        (1..=5)
            .map(|id| json!({"id": id, "latitude": 39.0 + f64::from(id), "longitude": -105.0}))
            .collect()
    }

    fn batch_of(size: usize) -> ImportOptions {
        ImportOptions::default()
            .with_batch_size(NonZeroUsize::new(size).expect("non-zero batch size"))
    }

    #[rstest]
    fn default_batch_size_is_fifty() {
        assert_eq!(ImportOptions::default().batch_size.get(), 50);
    }

    #[rstest]
    fn chunks_sequentially(records: Vec<Value>) {
        let mut sink = ScriptedSink::default();
        let report = import_trails(TrailSource::HikingProject, &records, &mut sink, batch_of(2));
        assert_eq!(
            sink.batches,
            [
                vec!["hp-1".to_owned(), "hp-2".to_owned()],
                vec!["hp-3".to_owned(), "hp-4".to_owned()],
                vec!["hp-5".to_owned()],
            ]
        );
        assert_eq!(report.inserted, 5);
        assert_eq!(report.failed_batches, 0);
    }

    #[rstest]
    fn failed_batch_does_not_stop_import(records: Vec<Value>) {
        let mut sink = ScriptedSink {
            reject: vec![0],
            ..ScriptedSink::default()
        };
        let report = import_trails(TrailSource::Usgs, &records, &mut sink, batch_of(2));
        assert_eq!(sink.batches.len(), 3);
        assert_eq!(report.failed_batches, 1);
        assert_eq!(report.inserted, 3);
        let bounds = report.bounds.expect("bounds for inserted trails");
        assert_eq!(bounds.min().y, 42.0);
        assert_eq!(bounds.max().y, 44.0);
    }

    #[rstest]
    fn undecodable_records_are_skipped(mut records: Vec<Value>) {
        records.insert(1, json!("not a trail"));
        let mut sink = ScriptedSink::default();
        let report = import_trails(TrailSource::Usgs, &records, &mut sink, batch_of(50));
        assert_eq!(report.records, 6);
        assert_eq!(report.normalized, 5);
        assert_eq!(report.failed_records, 1);
        assert_eq!(sink.batches.len(), 1);
    }

    #[rstest]
    fn empty_input_touches_nothing() {
        let mut sink = ScriptedSink::default();
        let report = import_trails(TrailSource::Usgs, &[], &mut sink, ImportOptions::default());
        assert!(sink.batches.is_empty());
        assert_eq!(report.bounds, None);
    }

    #[rstest]
    fn report_serializes_bounds_as_array(records: Vec<Value>) {
        let mut sink = ScriptedSink::default();
        let report = import_trails(TrailSource::Usgs, &records, &mut sink, batch_of(10));
        let value = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(value["source"], "usgs");
        assert_eq!(value["bounds"], json!([-105.0, 40.0, -105.0, 44.0]));
    }
}
