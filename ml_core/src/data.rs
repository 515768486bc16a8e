use std::{fmt, ops::Range};

use ndarray::{CowArray, Ix1, Ix2};

/// Errors produced while accessing dataset samples.
#[derive(Debug)]
pub enum DataError {
    /// The requested sample index is out of bounds.
    OutOfBounds { index: usize },

    /// The dataset could not provide a valid sample due to domain constraints.
    InvalidSample(&'static str),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::OutOfBounds { index } => write!(f, "sample index {index} is out of bounds"),
            DataError::InvalidSample(msg) => write!(f, "invalid sample: {msg}"),
        }
    }
}

impl std::error::Error for DataError {}

/// One batch of samples: a row of features per sample and the class label of each row.
///
/// Both halves borrow from the dataset when its storage allows and own a copy otherwise.
pub type Batch<'a> = (CowArray<'a, f32, Ix2>, CowArray<'a, usize, Ix1>);

/// A collection of labelled samples that can be evaluated.
///
/// A `Dataset` is responsible only for *providing access* to samples.
/// It does not define:
/// - how samples are scored,
/// - which metrics are computed over them,
/// - any specific model.
pub trait Dataset: Send + Sync {
    /// Returns the total number of samples.
    fn len(&self) -> usize;

    /// Returns `true` when the dataset holds no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetches the samples in `range`, in order.
    ///
    /// # Errors
    /// Returns `DataError::OutOfBounds` if `range` reaches past `len()`.
    fn batch(&self, range: Range<usize>) -> Result<Batch<'_>, DataError>;
}
