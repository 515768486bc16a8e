use std::collections::BTreeMap;

use ml_core::{MlError, Result};
use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// The value read out of a patch, in the metric's natural representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchValue {
    Scalar(f64),
    Counts(BTreeMap<String, u64>),
    Map(BTreeMap<String, f64>),
}

impl PatchValue {
    /// Returns the scalar, if this is one.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            PatchValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Looks up a labelled entry of a `Counts` or `Map` value.
    pub fn get(&self, label: &str) -> Option<f64> {
        match self {
            PatchValue::Scalar(_) => None,
            PatchValue::Counts(counts) => counts.get(label).map(|&c| c as f64),
            PatchValue::Map(map) => map.get(label).copied(),
        }
    }
}

/// A partial, mergeable metric computed from one batch of data.
///
/// A patch is built eagerly from the raw outputs of a single batch and from then on only ever
/// combined with other patches of the same kind. Implementations must make `merge` associative
/// and commutative, and merging with a patch that observed no items must give back the other
/// operand unchanged.
pub trait Patch: Sized + Send {
    /// A short, stable name for the kind of metric.
    fn kind(&self) -> &'static str;

    /// Returns `true` when the patch has observed no items.
    fn is_empty(&self) -> bool;

    /// Reads the current aggregate value. Never mutates the patch.
    fn value(&self) -> PatchValue;

    /// Combines two partial results.
    ///
    /// # Errors
    /// Returns `MlError::InvalidMerge` when the two patches are not compatible.
    fn merge(self, other: Self) -> Result<Self>;

    /// A description used in merge errors, the kind plus any parameters.
    fn describe(&self) -> String {
        self.kind().to_string()
    }
}

/// Checks that `scores` has one row per target and every target indexes a column.
pub(crate) fn check_batch(scores: ArrayView2<f32>, targets: ArrayView1<usize>) -> Result<()> {
    let (rows, cols) = scores.dim();

    if targets.len() != rows {
        return Err(MlError::ShapeMismatch {
            what: "targets",
            got: targets.len(),
            expected: rows,
        });
    }

    if rows > 0 && cols == 0 {
        return Err(MlError::InvalidInput("scores must have at least one class"));
    }

    if targets.iter().any(|&t| t >= cols) {
        return Err(MlError::InvalidInput("target label out of range"));
    }

    Ok(())
}
