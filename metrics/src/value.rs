use ml_core::{MlError, Result};
use ndarray::ArrayView1;

use crate::patch::{Patch, PatchValue};

/// A scalar averaged over samples, such as a batch loss.
///
/// The patch keeps the weighted sum and the weight rather than the mean itself, so merging is an
/// exact count-weighted average regardless of the order batches arrive in.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ValuePatch {
    sum: f64,
    count: u64,
}

impl ValuePatch {
    /// Wraps the mean `value` of a batch of `batch_size` samples.
    ///
    /// # Errors
    /// `MlError::InvalidInput` if `value` is not finite.
    pub fn new(value: f64, batch_size: usize) -> Result<Self> {
        if !value.is_finite() {
            return Err(MlError::InvalidInput("patch value must be finite"));
        }

        Ok(Self {
            sum: value * batch_size as f64,
            count: batch_size as u64,
        })
    }

    /// Averages one value per sample.
    pub fn mean_of(values: ArrayView1<f32>) -> Result<Self> {
        let sum: f64 = values.iter().map(|&v| v as f64).sum();

        match values.len() {
            0 => Ok(Self::zero()),
            n => Self::new(sum / n as f64, n),
        }
    }

    /// A patch that observed nothing.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The current mean, zero when nothing was observed.
    pub fn mean(&self) -> f64 {
        match self.count {
            0 => 0.0,
            n => self.sum / n as f64,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Patch for ValuePatch {
    fn kind(&self) -> &'static str {
        "value"
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn value(&self) -> PatchValue {
        PatchValue::Scalar(self.mean())
    }

    fn merge(self, other: Self) -> Result<Self> {
        Ok(Self {
            sum: self.sum + other.sum,
            count: self.count + other.count,
        })
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn merge_weights_by_batch_size() {
        let a = ValuePatch::new(1.0, 3).unwrap();
        let b = ValuePatch::new(5.0, 1).unwrap();

        let merged = a.merge(b).unwrap();
        assert_eq!(merged.value(), PatchValue::Scalar(2.0));
        assert_eq!(merged.count(), 4);
    }

    #[test]
    fn zero_is_identity() {
        let a = ValuePatch::new(0.25, 8).unwrap();

        assert_eq!(a.merge(ValuePatch::zero()).unwrap(), a);
        assert_eq!(ValuePatch::zero().merge(a).unwrap(), a);
        assert_eq!(ValuePatch::zero().mean(), 0.0);
    }

    #[test]
    fn mean_of_values() {
        let patch = ValuePatch::mean_of(array![1.0, 2.0, 3.0, 6.0].view()).unwrap();

        assert_eq!(patch.mean(), 3.0);
        assert_eq!(patch.count(), 4);
        assert!(ValuePatch::mean_of(ndarray::Array1::<f32>::zeros(0).view())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(ValuePatch::new(f64::NAN, 2).is_err());
        assert!(ValuePatch::new(f64::INFINITY, 2).is_err());
    }
}
