//! Error types raised while configuring the recommendation scorer.

use thiserror::Error;

/// Errors raised when validating [`ScoreWeights`](crate::ScoreWeights).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScoreWeightsError {
    /// A weight was NaN, infinite or negative.
    #[error("weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight {
        /// Field name of the offending weight.
        name: &'static str,
        /// Value supplied.
        value: f64,
    },
    /// The interaction recency window was zero days long.
    #[error("recent interaction window must be at least one day")]
    EmptyWindow,
}
