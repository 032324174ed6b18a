use std::io::Write;

use serde::Serialize;

use super::ReportSink;
use crate::{
    comparison::ComparisonReport, evaluation::EvaluationResult, training::TrainingRun, Result,
};

#[derive(Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
enum Record<'a> {
    TrainingRun(&'a TrainingRun),
    Evaluation(&'a EvaluationResult),
    Comparison(&'a ComparisonReport),
}

/// Writes every record as one line of JSON, tagged with its kind.
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write(&mut self, record: Record<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn training_run(&mut self, run: &TrainingRun) -> Result<()> {
        self.write(Record::TrainingRun(run))
    }

    fn evaluation(&mut self, evaluation: &EvaluationResult) -> Result<()> {
        self.write(Record::Evaluation(evaluation))
    }

    fn comparison(&mut self, report: &ComparisonReport) -> Result<()> {
        self.write(Record::Comparison(report))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::evaluation::evaluate;

    #[test]
    fn one_tagged_document_per_line() {
        let mut sink = JsonSink::new(Vec::new());
        let run = TrainingRun::from_history(0, 0.1, vec![2.0, 1.0]);
        let evaluation = evaluate(&[1.0, 2.5], &[1.0, 3.0]).unwrap();
        let report = ComparisonReport::from_runs(vec![run.clone()], Vec::new());

        sink.training_run(&run).unwrap();
        sink.evaluation(&evaluation).unwrap();
        sink.comparison(&report).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let docs: Vec<Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0]["kind"], "training_run");
        assert_eq!(docs[0]["record"]["loss_history"], serde_json::json!([2.0, 1.0]));
        assert_eq!(docs[1]["kind"], "evaluation");
        assert_eq!(docs[1]["record"]["mae"], 0.25);
        assert_eq!(docs[2]["kind"], "comparison");
        assert_eq!(docs[2]["record"]["best_by_final_loss"], 0);
    }
}
