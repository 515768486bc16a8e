mod any;
mod builder;
mod confusion;
mod hits;
mod loss;
mod patch;
mod record;
mod spec;
mod value;

pub use any::AnyPatch;
pub use builder::PatchBuilder;
pub use confusion::ConfusionPatch;
pub use hits::HitsCountPatch;
pub use loss::{CrossEntropy, LossFn, Mse};
pub use patch::{Patch, PatchValue};
pub use record::{PatchRecord, sum_maps};
pub use spec::{LossSpec, MetricSpec, NamedMetricSpec};
pub use value::ValuePatch;
