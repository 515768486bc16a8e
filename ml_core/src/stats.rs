/// Counters describing how much data an evaluation pass consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    batches: usize,
    samples: usize,
}

impl StepStats {
    /// Creates a new `StepStats`.
    ///
    /// # Args
    /// * `batches` - Number of batches processed.
    /// * `samples` - Total number of samples processed.
    pub fn new(batches: usize, samples: usize) -> Self {
        Self { batches, samples }
    }

    /// Returns the number of batches processed.
    pub fn batches(&self) -> usize {
        self.batches
    }

    /// Returns the number of samples processed.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Adds up the counters of two disjoint passes.
    pub fn merge(self, other: Self) -> Self {
        Self {
            batches: self.batches + other.batches,
            samples: self.samples + other.samples,
        }
    }
}
