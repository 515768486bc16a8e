use ml_core::Result;
use ndarray::{ArrayView1, ArrayView2};

use crate::patch::check_batch;

/// A loss evaluated over one batch of class scores.
pub trait LossFn: Send + Sync {
    /// Returns the mean loss over the batch.
    fn loss(&self, scores: ArrayView2<f32>, targets: ArrayView1<usize>) -> Result<f64>;
}

/// Cross entropy of the softmax of the scores against the true class.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrossEntropy;

impl LossFn for CrossEntropy {
    fn loss(&self, scores: ArrayView2<f32>, targets: ArrayView1<usize>) -> Result<f64> {
        check_batch(scores, targets)?;

        if targets.is_empty() {
            return Ok(0.0);
        }

        let total: f64 = scores
            .rows()
            .into_iter()
            .zip(targets)
            .map(|(row, &target)| {
                let max = row.iter().fold(f32::NEG_INFINITY, |m, &s| m.max(s)) as f64;
                let log_sum = row
                    .iter()
                    .map(|&s| (s as f64 - max).exp())
                    .sum::<f64>()
                    .ln();

                max + log_sum - row[target] as f64
            })
            .sum();

        Ok(total / targets.len() as f64)
    }
}

/// Mean squared error of the scores against one-hot encoded targets.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mse;

impl LossFn for Mse {
    fn loss(&self, scores: ArrayView2<f32>, targets: ArrayView1<usize>) -> Result<f64> {
        check_batch(scores, targets)?;

        if scores.is_empty() {
            return Ok(0.0);
        }

        let total: f64 = scores
            .rows()
            .into_iter()
            .zip(targets)
            .flat_map(|(row, &target)| {
                row.into_iter().enumerate().map(move |(j, &s)| {
                    let y = if j == target { 1.0 } else { 0.0 };
                    (s as f64 - y).powi(2)
                })
            })
            .sum();

        Ok(total / scores.len() as f64)
    }
}
