use std::{collections::BTreeMap, ops::Range, time::Instant};

use log::{debug, info};
use metrics::{PatchRecord, PatchValue};
use ml_core::{Dataset, MlError, StepStats};
use rayon::prelude::*;

use crate::{EvalConfig, EvalErr, Result, dataset::batch_ranges, task::EvalTask};

/// The outcome of an evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalReport {
    pub stats: StepStats,
    pub record: PatchRecord,
}

impl EvalReport {
    /// Reads the final value of every metric.
    pub fn values(&self) -> BTreeMap<String, PatchValue> {
        self.record.values()
    }

    pub fn value(&self, name: &str) -> std::result::Result<PatchValue, MlError> {
        self.record.value(name)
    }
}

/// Runs an `EvalTask` over every batch of a dataset and merges the per-batch patches.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    /// Creates a new `Evaluator`.
    ///
    /// # Arguments
    /// * `config` - The batch size and whether batches are evaluated on the rayon pool.
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    /// Evaluates `task` over every batch of `dataset`.
    ///
    /// # Returns
    /// The merged record and how many batches and samples it covers, or the first error a batch
    /// fetch, step or merge produced.
    pub fn run<T, D>(&self, task: &T, dataset: &D) -> Result<EvalReport>
    where
        T: EvalTask,
        D: Dataset,
    {
        let EvalConfig {
            batch_size,
            parallel,
        } = self.config;
        let start = Instant::now();
        let zero = task.zero()?;

        let step = |range: Range<usize>| -> Result<(StepStats, PatchRecord)> {
            let (x, y) = dataset.batch(range)?;
            let record = task.step(x.view(), y.view())?;
            Ok((StepStats::new(1, y.len()), record))
        };

        let (stats, record) = if parallel {
            let ranges: Vec<_> = batch_ranges(dataset.len(), batch_size).collect();

            ranges.into_par_iter().map(step).try_reduce(
                || (StepStats::default(), zero.clone()),
                |(sa, ra), (sb, rb)| Ok((sa.merge(sb), ra.merge(rb)?)),
            )?
        } else {
            batch_ranges(dataset.len(), batch_size).enumerate().try_fold(
                (StepStats::default(), zero),
                |(stats, acc), (i, range)| {
                    debug!(batch = i, start = range.start, end = range.end; "evaluating batch");
                    let (batch_stats, record) = step(range)?;
                    Ok::<_, EvalErr>((stats.merge(batch_stats), acc.merge(record)?))
                },
            )?
        };

        info!(
            batches = stats.batches(),
            samples = stats.samples(),
            parallel = parallel,
            elapsed_ms = start.elapsed().as_millis() as u64;
            "evaluation finished"
        );

        Ok(EvalReport { stats, record })
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use metrics::{MetricSpec, NamedMetricSpec, PatchBuilder};
    use ndarray::array;

    use super::*;
    use crate::{LabelledDataset, ModelTask, PrecomputedScores, RecordDataset};

    fn task() -> ModelTask<PrecomputedScores> {
        let specs = vec![NamedMetricSpec::new(
            "nhits",
            MetricSpec::HitsCount { at: vec![1, 2] },
        )];
        ModelTask::new(PrecomputedScores::new(3), PatchBuilder::new(specs).unwrap())
    }

    fn config(batch_size: usize, parallel: bool) -> EvalConfig {
        EvalConfig {
            batch_size: NonZeroUsize::new(batch_size).unwrap(),
            parallel,
        }
    }

    #[test]
    fn empty_dataset_reports_zero() {
        let dataset = LabelledDataset::new(vec![], 3, vec![]).unwrap();
        let report = Evaluator::new(config(4, false)).run(&task(), &dataset).unwrap();

        assert_eq!(report.stats, StepStats::default());
        assert_eq!(
            report.value("nhits").unwrap(),
            PatchValue::Counts([("@1".into(), 0), ("@2".into(), 0)].into())
        );
    }

    #[test]
    fn counts_batches_and_samples() {
        let x = array![[0.8, 0.1, 0.1], [0.1, 0.7, 0.2], [0.2, 0.5, 0.3]];
        let dataset = LabelledDataset::from_arrays(x, array![0, 0, 1]).unwrap();

        for parallel in [false, true] {
            let report = Evaluator::new(config(2, parallel))
                .run(&task(), &dataset)
                .unwrap();

            assert_eq!(report.stats, StepStats::new(2, 3));
            assert_eq!(
                report.value("nhits").unwrap(),
                PatchValue::Counts([("@1".into(), 2), ("@2".into(), 2)].into())
            );
        }
    }

    #[test]
    fn runs_over_any_dataset() {
        let rows = vec![vec![0.8, 0.1, 0.1], vec![0.1, 0.7, 0.2], vec![0.2, 0.5, 0.3]];
        let records = RecordDataset::new(rows, vec![0, 0, 1]).unwrap();

        for parallel in [false, true] {
            let report = Evaluator::new(config(2, parallel))
                .run(&task(), &records)
                .unwrap();

            assert_eq!(report.stats, StepStats::new(2, 3));
            assert_eq!(
                report.value("nhits").unwrap(),
                PatchValue::Counts([("@1".into(), 2), ("@2".into(), 2)].into())
            );
        }
    }
}
