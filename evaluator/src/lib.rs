pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod input;
pub mod task;

pub use config::EvalConfig;
pub use dataset::{LabelledDataset, RecordDataset};
pub use error::{EvalErr, Result};
pub use evaluator::{EvalReport, Evaluator};
pub use input::EvalInput;
pub use task::{EvalTask, ModelTask, PrecomputedScores};
