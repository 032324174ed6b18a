use log::{debug, info};
use serde::Serialize;

use crate::{
    config::LabConfig,
    data::{DataGenerator, SampleSet, PROBE_POINTS},
    evaluation::{evaluate_model, EvaluationResult},
    training::{EpochObserver, ModelHandle, ModelTrainer, TrainingRun},
    LabError, Result,
};

/// The prediction of a single, caller chosen input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointPrediction {
    pub input: f64,
    pub predicted: f64,
    /// The noise-free ground truth at `input`.
    pub expected: f64,
    pub abs_error: f64,
    /// `None` when `expected` is 0.
    pub pct_error: Option<f64>,
}

/// One train, predict and reset cycle over a single model.
///
/// The session owns every piece of state the cycle produces, so dropping or resetting it
/// releases all of it at once.
pub struct Session {
    config: LabConfig,
    generator: DataGenerator,
    trainer: ModelTrainer,
    training_set: Option<SampleSet>,
    handle: Option<ModelHandle>,
    run: Option<TrainingRun>,
    evaluation: Option<EvaluationResult>,
    training_r2: Option<f64>,
}

impl Session {
    /// Creates a new `Session`.
    ///
    /// # Arguments
    /// * `config` - The lab configuration, validated before anything is built.
    ///
    /// # Returns
    /// A new session with nothing trained yet, or the config's validation error.
    pub fn new(config: LabConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.data.seed;
        let trainer = ModelTrainer::new(config.training.trainer_options(seed))?;

        Ok(Self {
            generator: generator_for(seed),
            trainer,
            config,
            training_set: None,
            handle: None,
            run: None,
            evaluation: None,
            training_r2: None,
        })
    }

    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    pub fn trainer(&self) -> &ModelTrainer {
        &self.trainer
    }

    pub fn is_trained(&self) -> bool {
        self.handle.as_ref().is_some_and(ModelHandle::is_trained)
    }

    pub fn training_set(&self) -> Option<&SampleSet> {
        self.training_set.as_ref()
    }

    pub fn last_run(&self) -> Option<&TrainingRun> {
        self.run.as_ref()
    }

    pub fn last_evaluation(&self) -> Option<&EvaluationResult> {
        self.evaluation.as_ref()
    }

    /// R² of the trained model over its own training set. `None` until trained, or when the
    /// training targets are all equal.
    pub fn training_r2(&self) -> Option<f64> {
        self.training_r2
    }

    /// Generates a fresh training set and fits a fresh model on it, replacing whatever the
    /// session held before.
    pub fn train(&mut self) -> Result<&TrainingRun> {
        self.train_observed(&mut |_: usize, _: f64| {})
    }

    /// Same as `train`, notifying `observer` after every epoch.
    pub fn train_observed(&mut self, observer: &mut dyn EpochObserver) -> Result<&TrainingRun> {
        self.clear();

        let data = &self.config.data;
        let training_set = self.generator.generate_training_set(
            data.train_samples,
            data.line(),
            data.x_max,
            data.noise,
        )?;

        let mut handle = self.trainer.build(self.config.training.learning_rate)?;
        let run = self.trainer.fit_observed(
            &mut handle,
            &training_set,
            self.config.training.epochs,
            observer,
        )?;

        self.training_r2 = match evaluate_model(&handle, &training_set) {
            Ok(result) => Some(result.r2()),
            Err(LabError::DivisionByZero(what)) => {
                debug!("training accuracy is undefined, {what} has a zero denominator");
                None
            }
            Err(e) => return Err(e),
        };

        let error = run.parameter_error(data.slope, data.intercept);
        info!(
            final_loss = run.final_loss(),
            weight_error = error.weight,
            bias_error = error.bias;
            "session trained"
        );

        self.training_set = Some(training_set);
        self.handle = Some(handle);
        Ok(self.run.insert(run))
    }

    /// Evaluates the trained model on an evenly spaced, noise-free set that reaches past the
    /// training range.
    ///
    /// # Returns
    /// The evaluation, or `NotTrained` if nothing has been trained since the last reset.
    pub fn predict_unseen(&mut self) -> Result<&EvaluationResult> {
        let handle = self.trained_handle()?;
        let data = &self.config.data;
        let set = self
            .generator
            .generate_evaluation_set(data.eval_samples, data.line(), data.eval_x_max)?;

        let result = evaluate_model(handle, &set)?;
        info!(
            mae = result.mae(),
            r2 = result.r2(),
            extrapolated = set.extrapolated(data.x_max).count();
            "evaluated unseen points"
        );

        Ok(self.evaluation.insert(result))
    }

    /// Evaluates the trained model on the fixed `PROBE_POINTS`.
    pub fn predict_probes(&mut self) -> Result<&EvaluationResult> {
        let handle = self.trained_handle()?;
        let set = self.generator.probe_set(&PROBE_POINTS, self.config.data.line())?;
        let result = evaluate_model(handle, &set)?;

        Ok(self.evaluation.insert(result))
    }

    /// Predicts a single input and compares it against the ground truth.
    ///
    /// # Returns
    /// The prediction, `NotTrained` if nothing has been trained, or `InvalidArgument` if `x` is
    /// not finite.
    pub fn predict_one(&self, x: f64) -> Result<PointPrediction> {
        if !x.is_finite() {
            return Err(LabError::InvalidArgument(format!(
                "the input must be finite, got {x}"
            )));
        }

        let predicted = self.trained_handle()?.predict(&[x])?[0];
        let expected = self.config.data.line().at(x);
        let abs_error = (predicted - expected).abs();

        Ok(PointPrediction {
            input: x,
            predicted,
            expected,
            abs_error,
            pct_error: (expected != 0.0).then(|| abs_error / expected.abs() * 100.0),
        })
    }

    /// Drops the data, model and results of the session. The random source restarts from
    /// the configured seed, so a seeded session replays the same cycle after a reset.
    pub fn reset(&mut self) {
        self.clear();
        self.generator = generator_for(self.config.data.seed);
        info!("session reset");
    }

    fn clear(&mut self) {
        self.training_set = None;
        self.handle = None;
        self.run = None;
        self.evaluation = None;
        self.training_r2 = None;
    }

    fn trained_handle(&self) -> Result<&ModelHandle> {
        self.handle
            .as_ref()
            .filter(|handle| handle.is_trained())
            .ok_or(LabError::NotTrained)
    }
}

fn generator_for(seed: Option<u64>) -> DataGenerator {
    match seed {
        Some(seed) => DataGenerator::seeded(seed),
        None => DataGenerator::from_entropy(),
    }
}
