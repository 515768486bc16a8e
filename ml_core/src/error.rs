use std::fmt;

/// The result type shared by the metric and evaluation crates.
pub type Result<T> = std::result::Result<T, MlError>;

/// Errors produced while building, merging or reading metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MlError {
    /// An input is invalid for semantic or domain reasons.
    InvalidInput(&'static str),

    /// A shape invariant was violated (e.g. mismatched lengths).
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "targets", "scores").
        what: &'static str,
        /// Observed value.
        got: usize,
        /// Expected value.
        expected: usize,
    },

    /// Two accumulators that cannot be combined were merged.
    InvalidMerge {
        left: String,
        right: String,
    },

    /// A metric was requested by name but never produced.
    MissingMetric(String),
}

impl fmt::Display for MlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            MlError::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            MlError::InvalidMerge { left, right } => {
                write!(f, "cannot merge {left} with {right}")
            }
            MlError::MissingMetric(name) => write!(f, "metric {name} was never produced"),
        }
    }
}

impl std::error::Error for MlError {}
