use ml_core::{MlError, Result};

use crate::{
    ConfusionPatch, HitsCountPatch, ValuePatch,
    patch::{Patch, PatchValue},
};

/// Any of the patch kinds, so heterogeneous metrics can live in one record.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyPatch {
    Hits(HitsCountPatch),
    Value(ValuePatch),
    Confusion(ConfusionPatch),
}

impl Patch for AnyPatch {
    fn kind(&self) -> &'static str {
        match self {
            AnyPatch::Hits(p) => p.kind(),
            AnyPatch::Value(p) => p.kind(),
            AnyPatch::Confusion(p) => p.kind(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            AnyPatch::Hits(p) => p.is_empty(),
            AnyPatch::Value(p) => p.is_empty(),
            AnyPatch::Confusion(p) => p.is_empty(),
        }
    }

    fn value(&self) -> PatchValue {
        match self {
            AnyPatch::Hits(p) => p.value(),
            AnyPatch::Value(p) => p.value(),
            AnyPatch::Confusion(p) => p.value(),
        }
    }

    fn merge(self, other: Self) -> Result<Self> {
        match (self, other) {
            (AnyPatch::Hits(a), AnyPatch::Hits(b)) => a.merge(b).map(AnyPatch::Hits),
            (AnyPatch::Value(a), AnyPatch::Value(b)) => a.merge(b).map(AnyPatch::Value),
            (AnyPatch::Confusion(a), AnyPatch::Confusion(b)) => {
                a.merge(b).map(AnyPatch::Confusion)
            }
            (a, b) => Err(MlError::InvalidMerge {
                left: a.describe(),
                right: b.describe(),
            }),
        }
    }

    fn describe(&self) -> String {
        match self {
            AnyPatch::Hits(p) => p.describe(),
            AnyPatch::Value(p) => p.describe(),
            AnyPatch::Confusion(p) => p.describe(),
        }
    }
}

impl From<HitsCountPatch> for AnyPatch {
    fn from(value: HitsCountPatch) -> Self {
        Self::Hits(value)
    }
}

impl From<ValuePatch> for AnyPatch {
    fn from(value: ValuePatch) -> Self {
        Self::Value(value)
    }
}

impl From<ConfusionPatch> for AnyPatch {
    fn from(value: ConfusionPatch) -> Self {
        Self::Confusion(value)
    }
}
