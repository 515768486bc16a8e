use std::collections::BTreeMap;

use ml_core::{MlError, Result};
use ndarray::{ArrayView1, ArrayView2};

use crate::patch::{Patch, PatchValue, check_batch};

/// Default cutoffs evaluated when none are configured.
pub const DEFAULT_CUTOFFS: [usize; 2] = [1, 2];

/// Counts how many samples have their true label among the top-`k` scored classes, for every
/// configured cutoff `k`.
///
/// Merging two `HitsCountPatch`es sums the counts cutoff by cutoff, so both operands must have
/// been built with the same cutoffs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitsCountPatch {
    at: Vec<usize>,
    counts: Vec<u64>,
    samples: u64,
}

impl HitsCountPatch {
    /// Builds the patch for one batch.
    ///
    /// # Arguments
    /// * `scores` - One row of class scores per sample, higher is better.
    /// * `targets` - The true class of every sample.
    /// * `at` - The cutoffs to evaluate.
    ///
    /// # Errors
    /// `MlError::ShapeMismatch` if `scores` and `targets` disagree on the batch size and
    /// `MlError::InvalidInput` for empty or zero cutoffs and out of range labels.
    pub fn new(scores: ArrayView2<f32>, targets: ArrayView1<usize>, at: &[usize]) -> Result<Self> {
        check_batch(scores, targets)?;
        let mut patch = Self::zero(at)?;

        for (row, &target) in scores.rows().into_iter().zip(targets) {
            let rank = rank_of(row, target);

            for (&k, count) in patch.at.iter().zip(patch.counts.iter_mut()) {
                if rank <= k {
                    *count += 1;
                }
            }
        }

        patch.samples = targets.len() as u64;
        Ok(patch)
    }

    /// Builds a patch with the default cutoffs, `@1` and `@2`.
    pub fn with_default_cutoffs(
        scores: ArrayView2<f32>,
        targets: ArrayView1<usize>,
    ) -> Result<Self> {
        Self::new(scores, targets, &DEFAULT_CUTOFFS)
    }

    /// Returns a patch that observed nothing.
    pub fn zero(at: &[usize]) -> Result<Self> {
        let at = normalize_cutoffs(at)?;
        let counts = vec![0; at.len()];

        Ok(Self {
            at,
            counts,
            samples: 0,
        })
    }

    /// The sorted, deduplicated cutoffs.
    pub fn cutoffs(&self) -> &[usize] {
        &self.at
    }

    /// The number of samples observed.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Hit counts keyed by cutoff label, `"@k"`.
    pub fn counts(&self) -> BTreeMap<String, u64> {
        self.at
            .iter()
            .zip(&self.counts)
            .map(|(k, &count)| (label(*k), count))
            .collect()
    }

    /// Hit rates keyed by cutoff label. Every rate is zero when nothing was observed.
    pub fn rates(&self) -> BTreeMap<String, f64> {
        self.at
            .iter()
            .zip(&self.counts)
            .map(|(k, &count)| {
                let rate = match self.samples {
                    0 => 0.0,
                    n => count as f64 / n as f64,
                };
                (label(*k), rate)
            })
            .collect()
    }
}

impl Patch for HitsCountPatch {
    fn kind(&self) -> &'static str {
        "hits_count"
    }

    fn is_empty(&self) -> bool {
        self.samples == 0
    }

    fn value(&self) -> PatchValue {
        PatchValue::Counts(self.counts())
    }

    fn merge(mut self, other: Self) -> Result<Self> {
        if self.at != other.at {
            return Err(MlError::InvalidMerge {
                left: self.describe(),
                right: other.describe(),
            });
        }

        self.counts
            .iter_mut()
            .zip(&other.counts)
            .for_each(|(a, b)| *a += b);
        self.samples += other.samples;

        Ok(self)
    }

    fn describe(&self) -> String {
        let labels: Vec<_> = self.at.iter().map(|&k| label(k)).collect();
        format!("{}({})", self.kind(), labels.join(","))
    }
}

fn label(k: usize) -> String {
    format!("@{k}")
}

fn normalize_cutoffs(at: &[usize]) -> Result<Vec<usize>> {
    if at.is_empty() {
        return Err(MlError::InvalidInput("at least one cutoff is required"));
    }

    if at.contains(&0) {
        return Err(MlError::InvalidInput("cutoffs must be at least 1"));
    }

    let mut at = at.to_vec();
    at.sort_unstable();
    at.dedup();
    Ok(at)
}

/// The 1-indexed position of `target` when the classes are sorted by descending score. Ties go
/// to the lower class index.
fn rank_of(scores: ArrayView1<f32>, target: usize) -> usize {
    let target_score = scores[target];

    let ahead = scores
        .iter()
        .enumerate()
        .filter(|&(j, &s)| s > target_score || (s == target_score && j < target))
        .count();

    ahead + 1
}
