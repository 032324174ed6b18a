use std::time::Instant;

use serde::Serialize;

use crate::arch::Parameters;

/// An epoch counts as converged once its loss is within this factor of the final loss.
pub const CONVERGENCE_TOLERANCE: f64 = 1.10;

/// Returns the first 1-indexed epoch whose loss is at most `CONVERGENCE_TOLERANCE` times the
/// final loss.
///
/// A run that never gets there early reports its full length, and an empty history reports 0.
pub fn convergence_epoch(loss_history: &[f64]) -> usize {
    let Some(&last) = loss_history.last() else {
        return 0;
    };

    let threshold = last * CONVERGENCE_TOLERANCE;
    loss_history
        .iter()
        .position(|&loss| loss <= threshold)
        .map_or(loss_history.len(), |idx| idx + 1)
}

/// The frozen record of a completed fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingRun {
    config_id: usize,
    learning_rate: f64,
    epoch_count: usize,
    loss_history: Vec<f64>,
    learned_weight: f64,
    learned_bias: f64,
    wall_clock_seconds: f64,
    convergence_epoch: usize,
}

impl TrainingRun {
    pub fn config_id(&self) -> usize {
        self.config_id
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn epoch_count(&self) -> usize {
        self.epoch_count
    }

    /// One loss per epoch, epoch 1 first.
    pub fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    /// The loss of the last epoch.
    pub fn final_loss(&self) -> f64 {
        self.loss_history.last().copied().unwrap_or(f64::NAN)
    }

    pub fn parameters(&self) -> Parameters {
        Parameters {
            weight: self.learned_weight,
            bias: self.learned_bias,
        }
    }

    /// Absolute distance of the learned weight and bias to the true slope and intercept.
    pub fn parameter_error(&self, true_slope: f64, true_intercept: f64) -> Parameters {
        self.parameters().error_against(true_slope, true_intercept)
    }

    pub fn wall_clock_seconds(&self) -> f64 {
        self.wall_clock_seconds
    }

    pub fn convergence_epoch(&self) -> usize {
        self.convergence_epoch
    }
}

/// The mutable side of a `TrainingRun` while its fit is in progress: losses can only be
/// appended, and `finish` freezes it.
pub(crate) struct RunRecorder {
    config_id: usize,
    learning_rate: f64,
    epoch_count: usize,
    loss_history: Vec<f64>,
    started: Instant,
}

impl RunRecorder {
    pub fn start(config_id: usize, learning_rate: f64, epoch_count: usize) -> Self {
        Self {
            config_id,
            learning_rate,
            epoch_count,
            loss_history: Vec::with_capacity(epoch_count),
            started: Instant::now(),
        }
    }

    #[inline]
    pub fn push(&mut self, loss: f64) {
        self.loss_history.push(loss);
    }

    pub fn finish(self, params: Parameters) -> TrainingRun {
        debug_assert_eq!(self.loss_history.len(), self.epoch_count);

        TrainingRun {
            config_id: self.config_id,
            learning_rate: self.learning_rate,
            epoch_count: self.epoch_count,
            convergence_epoch: convergence_epoch(&self.loss_history),
            loss_history: self.loss_history,
            learned_weight: params.weight,
            learned_bias: params.bias,
            wall_clock_seconds: self.started.elapsed().as_secs_f64(),
        }
    }
}

#[cfg(test)]
impl TrainingRun {
    /// Builds a run straight from a loss history, bypassing any training.
    pub(crate) fn from_history(config_id: usize, learning_rate: f64, history: Vec<f64>) -> Self {
        let mut recorder = RunRecorder::start(config_id, learning_rate, history.len());
        history.into_iter().for_each(|loss| recorder.push(loss));
        recorder.finish(Parameters {
            weight: 0.0,
            bias: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convergence_is_the_first_epoch_within_tolerance() {
        assert_eq!(convergence_epoch(&[10.0, 5.0, 2.0, 2.05, 2.0]), 3);
    }

    #[test]
    fn steadily_falling_loss_converges_at_the_end() {
        assert_eq!(convergence_epoch(&[100.0, 50.0, 20.0, 10.0, 5.0]), 5);
    }

    #[test]
    fn flat_loss_converges_immediately() {
        assert_eq!(convergence_epoch(&[1.0, 1.0, 1.0]), 1);
    }

    #[test]
    fn non_finite_final_loss_reports_the_full_budget() {
        assert_eq!(convergence_epoch(&[1.0, 2.0, f64::NAN]), 3);
        assert_eq!(convergence_epoch(&[]), 0);
    }

    #[test]
    fn recorder_freezes_into_a_run() {
        let run = TrainingRun::from_history(2, 0.1, vec![4.0, 2.0, 1.0]);
        assert_eq!(run.config_id(), 2);
        assert_eq!(run.epoch_count(), 3);
        assert_eq!(run.loss_history(), &[4.0, 2.0, 1.0]);
        assert_eq!(run.final_loss(), 1.0);
        assert_eq!(run.convergence_epoch(), 3);
        assert!(run.wall_clock_seconds() >= 0.0);
    }
}
