mod json;
mod log_sink;

pub use json::JsonSink;
pub use log_sink::LogSink;

use crate::{
    comparison::ComparisonReport, evaluation::EvaluationResult, training::TrainingRun, Result,
};

/// Receives the structured records a lab run produces, for display or storage.
pub trait ReportSink {
    fn training_run(&mut self, run: &TrainingRun) -> Result<()>;

    fn evaluation(&mut self, evaluation: &EvaluationResult) -> Result<()>;

    fn comparison(&mut self, report: &ComparisonReport) -> Result<()>;
}
