use serde::{Deserialize, Serialize};

use crate::hits::DEFAULT_CUTOFFS;

/// The specification for the `LossFn` used by a loss metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossSpec {
    CrossEntropy,
    Mse,
}

/// The specification for one kind of patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSpec {
    HitsCount {
        #[serde(default = "default_cutoffs")]
        at: Vec<usize>,
    },
    Confusion {
        num_classes: usize,
    },
    Loss {
        loss: LossSpec,
    },
}

/// A metric spec together with the name its patches are recorded under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedMetricSpec {
    pub name: String,
    pub metric: MetricSpec,
}

impl NamedMetricSpec {
    pub fn new(name: impl Into<String>, metric: MetricSpec) -> Self {
        Self {
            name: name.into(),
            metric,
        }
    }
}

fn default_cutoffs() -> Vec<usize> {
    DEFAULT_CUTOFFS.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_snake_case_specs() {
        let json = r#"[
            {"name": "loss", "metric": {"loss": {"loss": "cross_entropy"}}},
            {"name": "nhits", "metric": {"hits_count": {"at": [1, 5]}}},
            {"name": "top", "metric": {"hits_count": {}}},
            {"name": "cm", "metric": {"confusion": {"num_classes": 10}}}
        ]"#;

        let specs: Vec<NamedMetricSpec> = serde_json::from_str(json).unwrap();
        assert_eq!(
            specs,
            vec![
                NamedMetricSpec::new(
                    "loss",
                    MetricSpec::Loss {
                        loss: LossSpec::CrossEntropy
                    }
                ),
                NamedMetricSpec::new("nhits", MetricSpec::HitsCount { at: vec![1, 5] }),
                NamedMetricSpec::new("top", MetricSpec::HitsCount { at: vec![1, 2] }),
                NamedMetricSpec::new("cm", MetricSpec::Confusion { num_classes: 10 }),
            ]
        );
    }
}
