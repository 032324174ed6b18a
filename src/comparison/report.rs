use std::cmp::Ordering;

use serde::Serialize;

use super::LearningRateRegime;
use crate::{evaluation::EvaluationResult, training::TrainingRun};

/// The outcome of a comparison: every run in config order plus the two winners.
///
/// Only ever built once all the configured runs completed.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    runs: Vec<TrainingRun>,
    /// One per run when the comparison was evaluated, otherwise empty.
    evaluations: Vec<EvaluationResult>,
    best_by_final_loss: usize,
    fastest_by_convergence: usize,
}

impl ComparisonReport {
    /// Ranks `runs`, which must not be empty.
    pub(crate) fn from_runs(runs: Vec<TrainingRun>, evaluations: Vec<EvaluationResult>) -> Self {
        debug_assert!(!runs.is_empty());
        debug_assert!(evaluations.is_empty() || evaluations.len() == runs.len());

        let best_by_final_loss = first_min_by(&runs, |a, b| {
            finite_or_max(a.final_loss()).total_cmp(&finite_or_max(b.final_loss()))
        });
        let fastest_by_convergence =
            first_min_by(&runs, |a, b| convergence_key(a).cmp(&convergence_key(b)));

        Self {
            runs,
            evaluations,
            best_by_final_loss,
            fastest_by_convergence,
        }
    }

    /// The runs in the order their configs were given.
    pub fn runs(&self) -> &[TrainingRun] {
        &self.runs
    }

    pub fn evaluations(&self) -> &[EvaluationResult] {
        &self.evaluations
    }

    /// The evaluation of the run at `idx`, if the comparison was evaluated.
    pub fn evaluation(&self, idx: usize) -> Option<&EvaluationResult> {
        self.evaluations.get(idx)
    }

    /// The run with the lowest final loss. Ties go to the earliest config.
    pub fn best_by_final_loss(&self) -> &TrainingRun {
        &self.runs[self.best_by_final_loss]
    }

    /// The run with the lowest convergence epoch. Ties go to the earliest config, and runs
    /// whose final loss isn't finite only win when every run diverged.
    pub fn fastest_by_convergence(&self) -> &TrainingRun {
        &self.runs[self.fastest_by_convergence]
    }

    pub fn best_index(&self) -> usize {
        self.best_by_final_loss
    }

    pub fn fastest_index(&self) -> usize {
        self.fastest_by_convergence
    }

    pub fn regime(&self, idx: usize) -> Option<LearningRateRegime> {
        self.runs
            .get(idx)
            .map(|run| LearningRateRegime::of(run.learning_rate()))
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Non-finite losses rank after every finite one.
fn finite_or_max(loss: f64) -> f64 {
    if loss.is_finite() {
        loss
    } else {
        f64::INFINITY
    }
}

/// Runs that ended on a non-finite loss "converge" trivially, so they rank after every run
/// that ended on a finite one.
fn convergence_key(run: &TrainingRun) -> (bool, usize) {
    (!run.final_loss().is_finite(), run.convergence_epoch())
}

fn first_min_by<F>(runs: &[TrainingRun], mut cmp: F) -> usize
where
    F: FnMut(&TrainingRun, &TrainingRun) -> Ordering,
{
    let mut best = 0;
    for (idx, run) in runs.iter().enumerate().skip(1) {
        if cmp(run, &runs[best]) == Ordering::Less {
            best = idx;
        }
    }
    best
}
