use log::info;

use super::ReportSink;
use crate::{
    comparison::{ComparisonReport, LearningRateRegime},
    evaluation::{ErrorBand, EvaluationResult},
    training::TrainingRun,
    Result,
};

/// Writes human readable summaries through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl ReportSink for LogSink {
    fn training_run(&mut self, run: &TrainingRun) -> Result<()> {
        let params = run.parameters();
        info!(
            "run {}: lr {} | {} epochs in {:.2}s | final loss {:.4} | converged at epoch {} | y = {:.4}x + {:.4}",
            run.config_id(),
            run.learning_rate(),
            run.epoch_count(),
            run.wall_clock_seconds(),
            run.final_loss(),
            run.convergence_epoch(),
            params.weight,
            params.bias,
        );
        Ok(())
    }

    fn evaluation(&mut self, evaluation: &EvaluationResult) -> Result<()> {
        for (i, ((x, expected), predicted)) in evaluation
            .inputs()
            .iter()
            .zip(evaluation.expected())
            .zip(evaluation.predicted())
            .enumerate()
        {
            let error = evaluation.per_point_abs_error()[i];
            info!(
                "x = {x:>6.2} | expected {expected:>7.3} | predicted {predicted:>7.3} | error {error:.3} ({})",
                ErrorBand::classify(error).label()
            );
        }

        let bands = evaluation.bands();
        info!(
            "mae {:.4} | max {:.4} | min {:.4} | r2 {:.4} | avg error {}",
            evaluation.mae(),
            evaluation.max_error(),
            evaluation.min_error(),
            evaluation.r2(),
            evaluation
                .average_error_percent()
                .map_or_else(|| "n/a".to_string(), |pct| format!("{pct:.2}%")),
        );
        info!(
            "{} excellent, {} fair, {} need improvement",
            bands.excellent, bands.fair, bands.needs_improvement
        );
        Ok(())
    }

    fn comparison(&mut self, report: &ComparisonReport) -> Result<()> {
        for (idx, run) in report.runs().iter().enumerate() {
            let regime = LearningRateRegime::of(run.learning_rate());
            let mae = report
                .evaluation(idx)
                .map_or_else(String::new, |e| format!(" | mae {:.4}", e.mae()));
            info!(
                "lr {:<6} | final loss {:>12.4} | converged at epoch {:>4}{mae} | {}",
                run.learning_rate(),
                run.final_loss(),
                run.convergence_epoch(),
                regime.label()
            );
        }

        info!(
            "best final loss: lr {} ({:.4}), fastest convergence: lr {} (epoch {})",
            report.best_by_final_loss().learning_rate(),
            report.best_by_final_loss().final_loss(),
            report.fastest_by_convergence().learning_rate(),
            report.fastest_by_convergence().convergence_epoch()
        );
        Ok(())
    }
}
