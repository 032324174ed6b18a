mod regime;
mod report;
mod runner;

pub use regime::LearningRateRegime;
pub use report::ComparisonReport;
pub use runner::{ComparisonRunner, ExecutionMode, RunConfig};
