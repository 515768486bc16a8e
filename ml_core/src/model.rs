use ndarray::{Array2, ArrayView2};

use crate::MlError;

/// A pure scoring function owned by the external training engine.
///
/// Evaluation only ever needs the forward pass: a `Model` maps one batch of
/// inputs (one sample per row) to one batch of class scores. It does not:
/// - own or update parameters,
/// - access datasets,
/// - implement training loops.
pub trait Model: Send + Sync {
    /// Returns the number of classes scored per sample.
    fn num_classes(&self) -> usize;

    /// Computes the scores for a batch of samples.
    ///
    /// # Errors
    /// Returns `MlError` if invariants are violated (e.g., shape mismatch).
    fn forward(&self, x: ArrayView2<f32>) -> Result<Array2<f32>, MlError>;
}
