use std::collections::HashSet;

use log::debug;
use ml_core::{MlError, Result};
use ndarray::{ArrayView1, ArrayView2};

use crate::{
    AnyPatch, ConfusionPatch, HitsCountPatch, PatchRecord, ValuePatch,
    loss::{CrossEntropy, LossFn, Mse},
    spec::{LossSpec, MetricSpec, NamedMetricSpec},
};

/// Builds the `PatchRecord` of a batch following a list of metric specs.
#[derive(Debug, Clone)]
pub struct PatchBuilder {
    specs: Vec<NamedMetricSpec>,
}

impl PatchBuilder {
    /// Creates a new `PatchBuilder`.
    ///
    /// The specs are validated up front so that a bad configuration fails before any batch is
    /// processed.
    ///
    /// # Errors
    /// `MlError::InvalidInput` for duplicate metric names, empty or zero cutoffs and zero classes.
    pub fn new(specs: Vec<NamedMetricSpec>) -> Result<Self> {
        let mut names = HashSet::new();

        for spec in &specs {
            if !names.insert(spec.name.as_str()) {
                return Err(MlError::InvalidInput("metric names must be unique"));
            }

            match &spec.metric {
                MetricSpec::HitsCount { at } => {
                    HitsCountPatch::zero(at)?;
                }
                MetricSpec::Confusion { num_classes } => {
                    ConfusionPatch::zero(*num_classes)?;
                }
                MetricSpec::Loss { .. } => {}
            }
        }

        Ok(Self { specs })
    }

    pub fn specs(&self) -> &[NamedMetricSpec] {
        &self.specs
    }

    /// Builds one patch per spec from a batch of scores and true labels.
    pub fn build(&self, scores: ArrayView2<f32>, targets: ArrayView1<usize>) -> Result<PatchRecord> {
        debug!(rows = scores.nrows(), metrics = self.specs.len(); "building patches");

        self.specs
            .iter()
            .map(|spec| {
                let patch = self.resolve_metric(&spec.metric, scores, targets)?;
                Ok((spec.name.clone(), patch))
            })
            .collect()
    }

    /// Builds a record where every metric observed nothing.
    pub fn zero(&self) -> Result<PatchRecord> {
        self.specs
            .iter()
            .map(|spec| {
                let patch: AnyPatch = match &spec.metric {
                    MetricSpec::HitsCount { at } => HitsCountPatch::zero(at)?.into(),
                    MetricSpec::Confusion { num_classes } => {
                        ConfusionPatch::zero(*num_classes)?.into()
                    }
                    MetricSpec::Loss { .. } => ValuePatch::zero().into(),
                };
                Ok((spec.name.clone(), patch))
            })
            .collect()
    }

    fn resolve_metric(
        &self,
        spec: &MetricSpec,
        scores: ArrayView2<f32>,
        targets: ArrayView1<usize>,
    ) -> Result<AnyPatch> {
        let patch = match spec {
            MetricSpec::HitsCount { at } => HitsCountPatch::new(scores, targets, at)?.into(),
            MetricSpec::Confusion { num_classes } => {
                ConfusionPatch::new(scores, targets, *num_classes)?.into()
            }
            MetricSpec::Loss { loss } => {
                let value = self.resolve_loss(*loss).loss(scores, targets)?;
                ValuePatch::new(value, targets.len())?.into()
            }
        };

        Ok(patch)
    }

    fn resolve_loss(&self, spec: LossSpec) -> &'static dyn LossFn {
        match spec {
            LossSpec::CrossEntropy => &CrossEntropy,
            LossSpec::Mse => &Mse,
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::{Patch, PatchValue};

    fn specs() -> Vec<NamedMetricSpec> {
        vec![
            NamedMetricSpec::new("loss", MetricSpec::Loss { loss: LossSpec::Mse }),
            NamedMetricSpec::new("nhits", MetricSpec::HitsCount { at: vec![1, 2] }),
            NamedMetricSpec::new("cm", MetricSpec::Confusion { num_classes: 3 }),
        ]
    }

    #[test]
    fn builds_one_patch_per_spec() {
        let builder = PatchBuilder::new(specs()).unwrap();
        let scores = array![[1.0, 0.0, 0.0], [0.0, 0.5, 1.0]];
        let targets = array![0, 1];

        let record = builder.build(scores.view(), targets.view()).unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(
            record.value("nhits").unwrap(),
            PatchValue::Counts([("@1".into(), 1), ("@2".into(), 2)].into())
        );
        assert_eq!(record.value("loss").unwrap(), PatchValue::Scalar(1.25 / 6.0));
        assert_eq!(record.value("cm").unwrap().get("accuracy"), Some(0.5));
    }

    #[test]
    fn zero_record_is_empty_everywhere() {
        let builder = PatchBuilder::new(specs()).unwrap();
        let zero = builder.zero().unwrap();

        assert_eq!(zero.len(), 3);
        assert!(zero.iter().all(|(_, patch)| patch.is_empty()));
    }

    #[test]
    fn rejects_bad_specs() {
        let duplicated = vec![
            NamedMetricSpec::new("a", MetricSpec::Confusion { num_classes: 2 }),
            NamedMetricSpec::new("a", MetricSpec::Confusion { num_classes: 2 }),
        ];
        assert!(PatchBuilder::new(duplicated).is_err());

        let no_cutoffs = vec![NamedMetricSpec::new("a", MetricSpec::HitsCount { at: vec![] })];
        assert!(PatchBuilder::new(no_cutoffs).is_err());
    }
}
