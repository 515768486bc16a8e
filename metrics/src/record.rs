use std::collections::{BTreeMap, btree_map};

use ml_core::{MlError, Result};

use crate::{AnyPatch, patch::{Patch, PatchValue}};

/// The patches produced for one batch, keyed by metric name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchRecord {
    patches: BTreeMap<String, AnyPatch>,
}

impl PatchRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a patch, returning the one previously stored under `name`.
    pub fn insert<P>(&mut self, name: impl Into<String>, patch: P) -> Option<AnyPatch>
    where
        P: Into<AnyPatch>,
    {
        self.patches.insert(name.into(), patch.into())
    }

    pub fn get(&self, name: &str) -> Option<&AnyPatch> {
        self.patches.get(name)
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AnyPatch> {
        self.patches.iter()
    }

    /// Merges two records name by name.
    ///
    /// A name present in only one of the records is carried over as is.
    ///
    /// # Errors
    /// Propagates the first `MlError::InvalidMerge` found, naming the offending metric.
    pub fn merge(mut self, other: Self) -> Result<Self> {
        for (name, patch) in other.patches {
            let merged = match self.patches.remove(&name) {
                Some(mine) => mine.merge(patch).map_err(|e| match e {
                    MlError::InvalidMerge { left, right } => MlError::InvalidMerge {
                        left: format!("{name}: {left}"),
                        right,
                    },
                    e => e,
                })?,
                None => patch,
            };

            self.patches.insert(name, merged);
        }

        Ok(self)
    }

    /// Reads the value of the metric called `name`.
    pub fn value(&self, name: &str) -> Result<PatchValue> {
        self.patches
            .get(name)
            .map(|patch| patch.value())
            .ok_or_else(|| MlError::MissingMetric(name.to_string()))
    }

    /// Reads every metric's value.
    pub fn values(&self) -> BTreeMap<String, PatchValue> {
        self.patches
            .iter()
            .map(|(name, patch)| (name.clone(), patch.value()))
            .collect()
    }
}

impl FromIterator<(String, AnyPatch)> for PatchRecord {
    fn from_iter<I: IntoIterator<Item = (String, AnyPatch)>>(iter: I) -> Self {
        Self {
            patches: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PatchRecord {
    type Item = (String, AnyPatch);
    type IntoIter = btree_map::IntoIter<String, AnyPatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.patches.into_iter()
    }
}

/// Sums labelled counts element-wise. Labels missing from a map count as zero.
pub fn sum_maps<'a, I>(maps: I) -> BTreeMap<String, u64>
where
    I: IntoIterator<Item = &'a BTreeMap<String, u64>>,
{
    let mut total = BTreeMap::new();

    for map in maps {
        for (label, count) in map {
            *total.entry(label.clone()).or_insert(0) += count;
        }
    }

    total
}
