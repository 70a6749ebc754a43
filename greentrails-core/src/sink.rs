//! The persistence boundary for normalized trails.
//!
//! Import code never reaches for a global database client; callers inject a
//! [`TrailSink`] instead.

use thiserror::Error;

use crate::NormalizedTrail;

/// Error reported by a sink when a batch could not be stored.
#[derive(Debug, Error)]
#[error("failed to insert batch of {batch_len} trails: {message}")]
pub struct SinkError {
    /// Number of trails in the rejected batch.
    pub batch_len: usize,
    /// Description of the failure.
    pub message: String,
    /// Underlying cause, when available.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl SinkError {
    /// Build an error without an underlying cause.
    pub fn new(batch_len: usize, message: impl Into<String>) -> Self {
        Self {
            batch_len,
            message: message.into(),
            source: None,
        }
    }

    /// Build an error wrapping an underlying cause.
    pub fn with_source<E>(batch_len: usize, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            batch_len,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

/// Destination for batches of normalized trails, typically a `trails` table.
///
/// Each call stores one batch. A failed batch must leave earlier batches in
/// place; importers count the failure and move on.
///
/// # Examples
/// ```
/// use greentrails_core::{NormalizedTrail, SinkError, TrailSink};
///
/// #[derive(Default)]
/// struct VecSink(Vec<NormalizedTrail>);
///
/// impl TrailSink for VecSink {
///     fn insert_batch(&mut self, batch: &[NormalizedTrail]) -> Result<usize, SinkError> {
///         self.0.extend_from_slice(batch);
///         Ok(batch.len())
///     }
/// }
///
/// let mut sink = VecSink::default();
/// assert_eq!(sink.insert_batch(&[]).unwrap(), 0);
/// ```
pub trait TrailSink {
    /// Store `batch`, returning the number of rows written.
    ///
    /// # Errors
    /// Returns [`SinkError`] when the batch could not be stored.
    fn insert_batch(&mut self, batch: &[NormalizedTrail]) -> Result<usize, SinkError>;
}

impl<T: TrailSink + ?Sized> TrailSink for &mut T {
    fn insert_batch(&mut self, batch: &[NormalizedTrail]) -> Result<usize, SinkError> {
        (**self).insert_batch(batch)
    }
}
