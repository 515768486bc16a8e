use std::{fs, path::Path};

use metrics::{NamedMetricSpec, PatchBuilder};
use serde::{Deserialize, Serialize};

use crate::{ModelTask, PrecomputedScores, RecordDataset, Result};

/// The file consumed by `patch-eval`: precomputed class scores, the true labels and the metrics
/// to compute over them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalInput {
    pub scores: Vec<Vec<f32>>,
    pub labels: Vec<usize>,
    pub metrics: Vec<NamedMetricSpec>,
}

impl EvalInput {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Splits the input into the dataset to evaluate and the task that scores it.
    ///
    /// # Errors
    /// `EvalErr::Data` for an empty or ragged score table and `EvalErr::Ml` for invalid metric
    /// specs.
    pub fn into_parts(self) -> Result<(RecordDataset, ModelTask<PrecomputedScores>)> {
        let dataset = RecordDataset::new(self.scores, self.labels)?;
        let builder = PatchBuilder::new(self.metrics)?;
        let model = PrecomputedScores::new(dataset.x_size());

        Ok((dataset, ModelTask::new(model, builder)))
    }
}
