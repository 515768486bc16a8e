use std::collections::BTreeMap;

use ml_core::{MlError, Result};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::patch::{Patch, PatchValue, check_batch};

/// Confusion-matrix counts for a single-label classifier.
///
/// Rows are true classes, columns are predicted classes (the highest score, ties going to the
/// lower index). Accuracy, precision, recall and F1 are all read from the matrix, so merging is
/// just an element-wise sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionPatch {
    matrix: Array2<u64>,
}

impl ConfusionPatch {
    /// Builds the patch for one batch.
    ///
    /// # Errors
    /// `MlError::ShapeMismatch` if the score columns are not `num_classes` or the batch sizes
    /// disagree, `MlError::InvalidInput` for out of range labels or zero classes.
    pub fn new(
        scores: ArrayView2<f32>,
        targets: ArrayView1<usize>,
        num_classes: usize,
    ) -> Result<Self> {
        let mut patch = Self::zero(num_classes)?;

        if scores.ncols() != num_classes {
            return Err(MlError::ShapeMismatch {
                what: "scores",
                got: scores.ncols(),
                expected: num_classes,
            });
        }

        check_batch(scores, targets)?;

        for (row, &target) in scores.rows().into_iter().zip(targets) {
            let predicted = argmax(row);
            patch.matrix[[target, predicted]] += 1;
        }

        Ok(patch)
    }

    /// A patch that observed nothing.
    pub fn zero(num_classes: usize) -> Result<Self> {
        if num_classes == 0 {
            return Err(MlError::InvalidInput("at least one class is required"));
        }

        Ok(Self {
            matrix: Array2::zeros((num_classes, num_classes)),
        })
    }

    pub fn num_classes(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn matrix(&self) -> &Array2<u64> {
        &self.matrix
    }

    pub fn total(&self) -> u64 {
        self.matrix.sum()
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.matrix.diag().sum(), self.total())
    }

    /// Macro-averaged precision, recall and F1 over every class that was either present or
    /// predicted.
    pub fn macro_scores(&self) -> (f64, f64, f64) {
        let support = self.matrix.sum_axis(Axis(1));
        let predicted = self.matrix.sum_axis(Axis(0));

        let mut seen = 0;
        let (mut precision, mut recall, mut f1) = (0.0, 0.0, 0.0);

        for c in 0..self.num_classes() {
            if support[c] == 0 && predicted[c] == 0 {
                continue;
            }

            let tp = self.matrix[[c, c]];
            let p = ratio(tp, predicted[c]);
            let r = ratio(tp, support[c]);

            precision += p;
            recall += r;
            if p + r > 0.0 {
                f1 += 2.0 * p * r / (p + r);
            }
            seen += 1;
        }

        if seen == 0 {
            return (0.0, 0.0, 0.0);
        }

        let seen = seen as f64;
        (precision / seen, recall / seen, f1 / seen)
    }
}

impl Patch for ConfusionPatch {
    fn kind(&self) -> &'static str {
        "confusion"
    }

    fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn value(&self) -> PatchValue {
        let (precision, recall, f1) = self.macro_scores();

        PatchValue::Map(BTreeMap::from([
            ("accuracy".to_string(), self.accuracy()),
            ("precision".to_string(), precision),
            ("recall".to_string(), recall),
            ("f1".to_string(), f1),
        ]))
    }

    fn merge(mut self, other: Self) -> Result<Self> {
        if self.num_classes() != other.num_classes() {
            return Err(MlError::InvalidMerge {
                left: self.describe(),
                right: other.describe(),
            });
        }

        self.matrix += &other.matrix;
        Ok(self)
    }

    fn describe(&self) -> String {
        format!("{}({} classes)", self.kind(), self.num_classes())
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    match den {
        0 => 0.0,
        d => num as f64 / d as f64,
    }
}

fn argmax(scores: ArrayView1<f32>) -> usize {
    scores
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best, best_score), (i, &s)| {
            if s > best_score { (i, s) } else { (best, best_score) }
        })
        .0
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn fills_matrix_from_argmax() {
        let scores = array![[0.9, 0.1], [0.2, 0.8], [0.7, 0.3], [0.4, 0.6]];
        let targets = array![0, 1, 1, 1];
        let patch = ConfusionPatch::new(scores.view(), targets.view(), 2).unwrap();

        assert_eq!(patch.matrix(), &array![[1u64, 0], [1, 2]]);
        assert_eq!(patch.accuracy(), 0.75);
    }

    #[test]
    fn macro_scores_skip_absent_classes() {
        let scores = array![[0.9, 0.1, 0.0], [0.1, 0.9, 0.0]];
        let targets = array![0, 1];
        let patch = ConfusionPatch::new(scores.view(), targets.view(), 3).unwrap();

        assert_eq!(patch.macro_scores(), (1.0, 1.0, 1.0));
        assert_eq!(patch.value().get("accuracy"), Some(1.0));
    }

    #[test]
    fn empty_matrix_reads_zero() {
        let patch = ConfusionPatch::zero(3).unwrap();

        assert!(patch.is_empty());
        assert_eq!(patch.accuracy(), 0.0);
        assert_eq!(patch.macro_scores(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn rejects_wrong_number_of_columns() {
        let scores = array![[0.9, 0.1]];
        let targets = array![0];

        let err = ConfusionPatch::new(scores.view(), targets.view(), 3).unwrap_err();
        assert!(matches!(err, MlError::ShapeMismatch { what: "scores", .. }));
        assert!(ConfusionPatch::zero(0).is_err());
    }

    #[test]
    fn merge_rejects_different_class_counts() {
        let a = ConfusionPatch::new(array![[1.0, 0.0]].view(), array![0].view(), 2).unwrap();
        let b =
            ConfusionPatch::new(array![[1.0, 0.0, 0.0]].view(), array![0].view(), 3).unwrap();

        assert!(matches!(a.merge(b), Err(MlError::InvalidMerge { .. })));
    }

    #[test]
    fn empty_patches_still_check_class_counts() {
        let a = ConfusionPatch::new(array![[1.0, 0.0]].view(), array![0].view(), 2).unwrap();
        let zero7 = ConfusionPatch::zero(7).unwrap();

        assert!(matches!(
            a.clone().merge(zero7.clone()),
            Err(MlError::InvalidMerge { .. })
        ));
        assert!(matches!(
            ConfusionPatch::zero(2).unwrap().merge(zero7),
            Err(MlError::InvalidMerge { .. })
        ));
        assert_eq!(a.clone().merge(ConfusionPatch::zero(2).unwrap()).unwrap(), a);
    }
}
