use metrics::{PatchBuilder, PatchRecord};
use ml_core::{MlError, Model};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Turns one batch into the named patches of every metric tracked.
///
/// This is the only interface the `Evaluator` needs: how samples are scored and which metrics
/// are computed lives behind implementations of this trait.
pub trait EvalTask: Send + Sync {
    /// Computes the patches of one batch.
    ///
    /// # Errors
    /// `MlError::ShapeMismatch` or `MlError::InvalidInput` when the batch doesn't fit the
    /// model or the metrics.
    fn step(&self, x: ArrayView2<f32>, y: ArrayView1<usize>) -> Result<PatchRecord, MlError>;

    /// The record of a pass that saw no batches.
    fn zero(&self) -> Result<PatchRecord, MlError>;
}

/// Scores each batch with a `Model` and builds its patches with a `PatchBuilder`.
#[derive(Debug)]
pub struct ModelTask<M: Model> {
    model: M,
    builder: PatchBuilder,
}

impl<M: Model> ModelTask<M> {
    pub fn new(model: M, builder: PatchBuilder) -> Self {
        Self { model, builder }
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: Model> EvalTask for ModelTask<M> {
    fn step(&self, x: ArrayView2<f32>, y: ArrayView1<usize>) -> Result<PatchRecord, MlError> {
        let scores = self.model.forward(x)?;
        let (rows, classes) = scores.dim();

        if rows != x.nrows() {
            return Err(MlError::ShapeMismatch {
                what: "model output rows",
                got: rows,
                expected: x.nrows(),
            });
        }

        if classes != self.model.num_classes() {
            return Err(MlError::ShapeMismatch {
                what: "model output classes",
                got: classes,
                expected: self.model.num_classes(),
            });
        }

        self.builder.build(scores.view(), y)
    }

    fn zero(&self) -> Result<PatchRecord, MlError> {
        self.builder.zero()
    }
}

/// A `Model` for scores that were already computed elsewhere: every input row *is* the row of
/// class scores.
#[derive(Debug, Clone, Copy)]
pub struct PrecomputedScores {
    num_classes: usize,
}

impl PrecomputedScores {
    pub fn new(num_classes: usize) -> Self {
        Self { num_classes }
    }
}

impl Model for PrecomputedScores {
    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn forward(&self, x: ArrayView2<f32>) -> Result<Array2<f32>, MlError> {
        if x.ncols() != self.num_classes {
            return Err(MlError::ShapeMismatch {
                what: "scores",
                got: x.ncols(),
                expected: self.num_classes,
            });
        }

        Ok(x.to_owned())
    }
}
