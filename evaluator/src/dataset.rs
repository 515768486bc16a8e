use std::{num::NonZeroUsize, ops::Range};

use ml_core::{Batch, DataError, Dataset};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, CowArray, s};
use rand::{Rng, seq::SliceRandom};

/// Splits `0..len` into consecutive ranges of `batch_size` samples. The last range holds
/// whatever is left and may be shorter.
pub fn batch_ranges(len: usize, batch_size: NonZeroUsize) -> impl Iterator<Item = Range<usize>> {
    let size = batch_size.get();
    (0..len)
        .step_by(size)
        .map(move |start| start..(start + size).min(len))
}

fn check_range(range: &Range<usize>, len: usize) -> Result<(), DataError> {
    if range.start > range.end || range.end > len {
        return Err(DataError::OutOfBounds {
            index: range.end.saturating_sub(1).max(range.start),
        });
    }

    Ok(())
}

/// An in-memory dataset of feature rows and their class labels.
#[derive(Debug, Clone)]
pub struct LabelledDataset {
    x: Array2<f32>,
    y: Array1<usize>,
}

impl LabelledDataset {
    /// Creates a new `LabelledDataset`.
    ///
    /// # Arguments
    /// * `data` - The features, row-major, `x_size` values per sample.
    /// * `x_size` - The amount of features per sample.
    /// * `labels` - One class label per sample.
    ///
    /// # Errors
    /// `DataError::InvalidSample` if `data` can't be split into one row per label.
    pub fn new(data: Vec<f32>, x_size: usize, labels: Vec<usize>) -> Result<Self, DataError> {
        if x_size == 0 {
            return Err(DataError::InvalidSample("samples need at least one feature"));
        }

        if data.len() != x_size * labels.len() {
            return Err(DataError::InvalidSample(
                "feature count doesn't match the number of labels",
            ));
        }

        let x = Array2::from_shape_vec((labels.len(), x_size), data)
            .map_err(|_| DataError::InvalidSample("features are not row-major"))?;

        Ok(Self {
            x,
            y: Array1::from_vec(labels),
        })
    }

    /// Builds a dataset straight from owned arrays.
    pub fn from_arrays(x: Array2<f32>, y: Array1<usize>) -> Result<Self, DataError> {
        if x.nrows() != y.len() {
            return Err(DataError::InvalidSample(
                "feature rows don't match the number of labels",
            ));
        }

        Ok(Self { x, y })
    }

    pub fn x_size(&self) -> usize {
        self.x.ncols()
    }

    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.x.view()
    }

    pub fn labels(&self) -> ArrayView1<'_, usize> {
        self.y.view()
    }

    /// Randomly permutes the samples, keeping every row with its label.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.y.len()).collect();
        order.shuffle(rng);

        self.x = self.x.select(Axis(0), &order);
        self.y = self.y.select(Axis(0), &order);
    }
}

impl Dataset for LabelledDataset {
    fn len(&self) -> usize {
        self.y.len()
    }

    fn batch(&self, range: Range<usize>) -> Result<Batch<'_>, DataError> {
        check_range(&range, self.y.len())?;

        let x = self.x.slice(s![range.clone(), ..]);
        let y = self.y.slice(s![range]);
        Ok((CowArray::from(x), CowArray::from(y)))
    }
}

/// A dataset kept as one record per sample, as it usually arrives from a file. Batches are
/// gathered into fresh arrays.
#[derive(Debug, Clone)]
pub struct RecordDataset {
    rows: Vec<Vec<f32>>,
    labels: Vec<usize>,
    x_size: usize,
}

impl RecordDataset {
    /// Creates a new `RecordDataset`.
    ///
    /// # Errors
    /// `DataError::InvalidSample` for an empty or ragged table, or a label count that doesn't
    /// match the rows.
    pub fn new(rows: Vec<Vec<f32>>, labels: Vec<usize>) -> Result<Self, DataError> {
        let x_size = rows
            .first()
            .map(Vec::len)
            .ok_or(DataError::InvalidSample("no samples"))?;

        if x_size == 0 {
            return Err(DataError::InvalidSample("samples need at least one feature"));
        }

        if rows.iter().any(|row| row.len() != x_size) {
            return Err(DataError::InvalidSample("every row must have the same length"));
        }

        if rows.len() != labels.len() {
            return Err(DataError::InvalidSample(
                "feature rows don't match the number of labels",
            ));
        }

        Ok(Self {
            rows,
            labels,
            x_size,
        })
    }

    pub fn x_size(&self) -> usize {
        self.x_size
    }
}

impl Dataset for RecordDataset {
    fn len(&self) -> usize {
        self.labels.len()
    }

    fn batch(&self, range: Range<usize>) -> Result<Batch<'_>, DataError> {
        check_range(&range, self.labels.len())?;

        let rows = &self.rows[range.clone()];
        let data = rows.iter().flatten().copied().collect();
        let x = Array2::from_shape_vec((rows.len(), self.x_size), data)
            .map_err(|_| DataError::InvalidSample("features are not row-major"))?;
        let y = Array1::from(self.labels[range].to_vec());

        Ok((CowArray::from(x), CowArray::from(y)))
    }
}
