use std::panic::{self, AssertUnwindSafe};

use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use super::{
    handle::{HandleState, ModelHandle},
    run::RunRecorder,
    EpochObserver, TrainingRun,
};
use crate::{
    arch::{loss::Mse, LinearModel, Model},
    data::{Batches, SampleSet},
    optimization::OptimizerKind,
    LabError, Result,
};

/// How often, in epochs, the running loss is logged.
const LOG_EVERY: usize = 10;

/// The knobs shared by every model a `ModelTrainer` builds and fits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainerOptions {
    /// Samples per optimizer step.
    pub batch_size: usize,
    /// Whether the samples are reordered before every epoch.
    pub shuffle: bool,
    pub optimizer: OptimizerKind,
    /// Base seed for weight initialization and shuffling. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        Self {
            batch_size: 32,
            shuffle: true,
            optimizer: OptimizerKind::default(),
            seed: None,
        }
    }
}

/// Builds linear models and fits them for a fixed epoch budget under a mean squared error
/// objective.
#[derive(Debug, Clone)]
pub struct ModelTrainer {
    options: TrainerOptions,
}

impl ModelTrainer {
    /// Creates a new `ModelTrainer`.
    ///
    /// # Returns
    /// A `ConfigurationError` if the batch size is 0.
    pub fn new(options: TrainerOptions) -> Result<Self> {
        if options.batch_size == 0 {
            return Err(LabError::ConfigurationError(
                "batch_size must be greater than 0".into(),
            ));
        }

        Ok(Self { options })
    }

    pub fn options(&self) -> &TrainerOptions {
        &self.options
    }

    /// Builds a fresh, untrained model handle.
    ///
    /// # Arguments
    /// * `learning_rate` - The optimizer's step size.
    ///
    /// # Returns
    /// A `ConfigurationError` if the learning rate isn't a finite positive number.
    pub fn build(&self, learning_rate: f64) -> Result<ModelHandle> {
        self.build_for(0, learning_rate)
    }

    /// Same as `build`, tagging the handle with `config_id`. Handles built for different ids
    /// draw from independent random streams derived from the base seed.
    pub fn build_for(&self, config_id: usize, learning_rate: f64) -> Result<ModelHandle> {
        validate_learning_rate(learning_rate)?;

        let mut rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(config_id as u64)),
            None => StdRng::from_os_rng(),
        };
        let model = LinearModel::init(&mut rng)?;
        let optimizer = self.options.optimizer.build(model.size(), learning_rate);

        debug!(
            config_id = config_id,
            learning_rate = learning_rate,
            optimizer = self.options.optimizer.name();
            "built model"
        );

        Ok(ModelHandle {
            config_id,
            learning_rate,
            model,
            optimizer,
            rng,
            state: HandleState::Untrained,
        })
    }

    /// Fits `handle` on `data` for exactly `epochs` epochs.
    ///
    /// # Returns
    /// The completed run, `AlreadyTrained` if the handle was fitted before, or a
    /// `ConfigurationError` if `epochs` is 0.
    pub fn fit(
        &self,
        handle: &mut ModelHandle,
        data: &SampleSet,
        epochs: usize,
    ) -> Result<TrainingRun> {
        self.fit_observed(handle, data, epochs, &mut |_: usize, _: f64| {})
    }

    /// Same as `fit`, notifying `observer` after every epoch.
    ///
    /// The observer runs on the calling thread, after the epoch's loss has been recorded and
    /// before the next epoch starts. If it panics, the panic is logged and training continues.
    pub fn fit_observed(
        &self,
        handle: &mut ModelHandle,
        data: &SampleSet,
        epochs: usize,
        observer: &mut dyn EpochObserver,
    ) -> Result<TrainingRun> {
        if handle.state != HandleState::Untrained {
            return Err(LabError::AlreadyTrained);
        }
        if epochs == 0 {
            return Err(LabError::ConfigurationError(
                "epochs must be greater than 0".into(),
            ));
        }

        handle.state = HandleState::Fitting;
        info!(
            config_id = handle.config_id,
            learning_rate = handle.learning_rate,
            epochs = epochs,
            samples = data.len();
            "training started"
        );

        let mut batches = Batches::new(data);
        let mut recorder = RunRecorder::start(handle.config_id, handle.learning_rate, epochs);
        let mut warned = false;

        let ModelHandle {
            model,
            optimizer,
            rng,
            ..
        } = &mut *handle;

        for epoch in 1..=epochs {
            if self.options.shuffle {
                batches.shuffle(rng);
            }

            let loss = model.backprop(
                &Mse,
                &mut **optimizer,
                batches.iter(self.options.batch_size),
            )?;
            recorder.push(loss);

            if !loss.is_finite() && !warned {
                warn!(epoch = epoch, loss = loss; "loss is no longer finite, the learning rate may be too high");
                warned = true;
            }
            if epoch % LOG_EVERY == 0 {
                debug!("epoch {epoch}/{epochs} - loss: {loss:.6}");
            }

            notify(observer, epoch, loss);
        }

        handle.state = HandleState::Trained;
        let params = handle.model.parameters();
        let run = recorder.finish(params);

        info!(
            config_id = run.config_id(),
            final_loss = run.final_loss(),
            weight = params.weight,
            bias = params.bias,
            seconds = run.wall_clock_seconds();
            "training finished"
        );

        Ok(run)
    }
}

fn validate_learning_rate(learning_rate: f64) -> Result<()> {
    if !learning_rate.is_finite() || learning_rate <= 0.0 {
        return Err(LabError::ConfigurationError(format!(
            "learning rate must be a finite positive number, got {learning_rate}"
        )));
    }
    Ok(())
}

fn notify(observer: &mut dyn EpochObserver, epoch: usize, loss: f64) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| observer.on_epoch_end(epoch, loss)));
    if outcome.is_err() {
        warn!(epoch = epoch; "epoch observer panicked, training continues");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataGenerator, Line};

    const LINE: Line = Line {
        slope: 2.0,
        intercept: 1.0,
    };

    fn seeded(seed: u64) -> ModelTrainer {
        ModelTrainer::new(TrainerOptions {
            seed: Some(seed),
            ..TrainerOptions::default()
        })
        .unwrap()
    }

    fn training_set(seed: u64) -> SampleSet {
        DataGenerator::seeded(seed)
            .generate_training_set(100, LINE, 10.0, 1.0)
            .unwrap()
    }

    #[test]
    fn build_rejects_invalid_learning_rates() {
        let trainer = seeded(0);
        for lr in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                trainer.build(lr),
                Err(LabError::ConfigurationError(_))
            ));
        }
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let options = TrainerOptions {
            batch_size: 0,
            ..TrainerOptions::default()
        };
        assert!(matches!(
            ModelTrainer::new(options),
            Err(LabError::ConfigurationError(_))
        ));
    }

    #[test]
    fn predict_before_fit_fails() {
        let handle = seeded(0).build(0.1).unwrap();
        assert!(matches!(handle.predict(&[1.0]), Err(LabError::NotTrained)));
        assert!(matches!(handle.parameters(), Err(LabError::NotTrained)));
    }

    #[test]
    fn fit_records_one_loss_per_epoch_in_order() {
        let trainer = seeded(1);
        let data = training_set(1);
        let mut handle = trainer.build(0.1).unwrap();

        let mut seen = Vec::new();
        let run = trainer
            .fit_observed(&mut handle, &data, 25, &mut |epoch: usize, loss: f64| {
                seen.push((epoch, loss))
            })
            .unwrap();

        assert_eq!(run.loss_history().len(), 25);
        assert_eq!(run.epoch_count(), 25);
        let epochs: Vec<_> = seen.iter().map(|(e, _)| *e).collect();
        assert_eq!(epochs, (1..=25).collect::<Vec<_>>());
        let losses: Vec<_> = seen.iter().map(|(_, l)| *l).collect();
        assert_eq!(losses, run.loss_history());
        assert!(handle.is_trained());
    }

    #[test]
    fn fitting_twice_is_rejected() {
        let trainer = seeded(2);
        let data = training_set(2);
        let mut handle = trainer.build(0.1).unwrap();

        trainer.fit(&mut handle, &data, 5).unwrap();
        assert!(matches!(
            trainer.fit(&mut handle, &data, 5),
            Err(LabError::AlreadyTrained)
        ));
    }

    #[test]
    fn zero_epochs_is_rejected_without_consuming_the_handle() {
        let trainer = seeded(2);
        let data = training_set(2);
        let mut handle = trainer.build(0.1).unwrap();

        assert!(matches!(
            trainer.fit(&mut handle, &data, 0),
            Err(LabError::ConfigurationError(_))
        ));
        assert_eq!(handle.state(), HandleState::Untrained);
    }

    #[test]
    fn panicking_observer_does_not_stop_training() {
        let trainer = seeded(3);
        let data = training_set(3);
        let mut handle = trainer.build(0.1).unwrap();

        let run = trainer
            .fit_observed(&mut handle, &data, 10, &mut |epoch: usize, _: f64| {
                if epoch == 4 {
                    panic!("observer failure");
                }
            })
            .unwrap();

        assert_eq!(run.loss_history().len(), 10);
    }

    #[test]
    fn adam_learns_the_line() {
        let trainer = seeded(4);
        let data = training_set(4);
        let mut handle = trainer.build(0.1).unwrap();

        let run = trainer.fit(&mut handle, &data, 100).unwrap();
        let params = handle.parameters().unwrap();

        assert!(run.final_loss() < run.loss_history()[0]);
        assert!(run.final_loss() < 1.0, "final loss {}", run.final_loss());
        assert!((params.weight - 2.0).abs() < 0.3, "weight {}", params.weight);
        assert_eq!(params, run.parameters());
    }

    #[test]
    fn full_batch_gradient_descent_decreases_monotonically() {
        let trainer = ModelTrainer::new(TrainerOptions {
            batch_size: 1000,
            shuffle: false,
            optimizer: OptimizerKind::GradientDescent,
            seed: Some(5),
        })
        .unwrap();
        let data = DataGenerator::seeded(5)
            .generate_training_set(100, LINE, 10.0, 0.0)
            .unwrap();
        let mut handle = trainer.build(0.01).unwrap();

        let run = trainer.fit(&mut handle, &data, 100).unwrap();

        for w in run.loss_history().windows(2) {
            assert!(w[1] <= w[0]);
        }
    }

    #[test]
    fn predict_is_idempotent() {
        let trainer = seeded(6);
        let data = training_set(6);
        let mut handle = trainer.build(0.1).unwrap();
        trainer.fit(&mut handle, &data, 10).unwrap();

        let inputs = [0.0, 5.0, 12.0];
        let a = handle.predict(&inputs).unwrap();
        let b = handle.predict(&inputs).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), inputs.len());
    }

    #[test]
    fn same_seed_same_run() {
        let data = training_set(7);
        let fit = |trainer: &ModelTrainer| {
            let mut handle = trainer.build(0.1).unwrap();
            trainer.fit(&mut handle, &data, 20).unwrap()
        };

        let a = fit(&seeded(7));
        let b = fit(&seeded(7));
        assert_eq!(a.loss_history(), b.loss_history());
        assert_eq!(a.parameters(), b.parameters());
    }
}
