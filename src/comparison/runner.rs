use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::ComparisonReport;
use crate::{
    data::SampleSet,
    evaluation::{evaluate_model, EvaluationResult},
    training::{ModelHandle, ModelTrainer, TrainingRun},
    LabError, Result,
};

/// One configuration to compare. Its `config_id` is its position in the config list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub learning_rate: f64,
}

impl RunConfig {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }

    pub fn from_learning_rates(learning_rates: &[f64]) -> Vec<Self> {
        learning_rates.iter().copied().map(Self::new).collect()
    }
}

/// How the configured runs are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One run at a time, in config order.
    #[default]
    Sequential,
    /// Runs spread over the rayon thread pool. Results are still reported in config order.
    Parallel,
}

/// Trains one model per configuration on the same data and ranks the results.
#[derive(Debug, Clone)]
pub struct ComparisonRunner {
    trainer: ModelTrainer,
    mode: ExecutionMode,
}

impl ComparisonRunner {
    /// Creates a new `ComparisonRunner`.
    ///
    /// # Arguments
    /// * `trainer` - Builds and fits the model of every run.
    /// * `mode` - Whether runs are trained one after the other or concurrently.
    pub fn new(trainer: ModelTrainer, mode: ExecutionMode) -> Self {
        Self { trainer, mode }
    }

    pub fn trainer(&self) -> &ModelTrainer {
        &self.trainer
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Trains a model per config on `training_set` for `epochs` epochs.
    ///
    /// # Returns
    /// A report with one run per config in input order, `EmptyConfigSet` if there are no
    /// configs, or the first error any run hit. On error no report is produced.
    pub fn run(
        &self,
        configs: &[RunConfig],
        training_set: &SampleSet,
        epochs: usize,
    ) -> Result<ComparisonReport> {
        self.compare(configs, training_set, None, epochs)
    }

    /// Same as `run`, also evaluating every trained model on `evaluation_set`.
    pub fn run_with_evaluation(
        &self,
        configs: &[RunConfig],
        training_set: &SampleSet,
        evaluation_set: &SampleSet,
        epochs: usize,
    ) -> Result<ComparisonReport> {
        self.compare(configs, training_set, Some(evaluation_set), epochs)
    }

    fn compare(
        &self,
        configs: &[RunConfig],
        training_set: &SampleSet,
        evaluation_set: Option<&SampleSet>,
        epochs: usize,
    ) -> Result<ComparisonReport> {
        if configs.is_empty() {
            return Err(LabError::EmptyConfigSet);
        }
        if epochs == 0 {
            return Err(LabError::ConfigurationError(
                "epochs must be greater than 0".into(),
            ));
        }

        // Building every handle first rejects a bad learning rate before any training.
        let handles = configs
            .iter()
            .enumerate()
            .map(|(id, config)| self.trainer.build_for(id, config.learning_rate))
            .collect::<Result<Vec<_>>>()?;

        info!(configs = configs.len(), epochs = epochs; "comparison started ({:?})", self.mode);

        let train =
            |handle: ModelHandle| self.train_one(handle, training_set, evaluation_set, epochs);
        let outcomes = match self.mode {
            ExecutionMode::Sequential => handles
                .into_iter()
                .map(train)
                .collect::<Result<Vec<_>>>()?,
            ExecutionMode::Parallel => handles
                .into_par_iter()
                .map(train)
                .collect::<Result<Vec<_>>>()?,
        };

        let (runs, evaluations): (Vec<_>, Vec<_>) = outcomes.into_iter().unzip();
        let evaluations = evaluations.into_iter().flatten().collect();
        let report = ComparisonReport::from_runs(runs, evaluations);

        info!(
            best = report.best_index(),
            best_final_loss = report.best_by_final_loss().final_loss(),
            fastest = report.fastest_index(),
            fastest_convergence_epoch = report.fastest_by_convergence().convergence_epoch();
            "comparison ranked"
        );

        Ok(report)
    }

    fn train_one(
        &self,
        mut handle: ModelHandle,
        training_set: &SampleSet,
        evaluation_set: Option<&SampleSet>,
        epochs: usize,
    ) -> Result<(TrainingRun, Option<EvaluationResult>)> {
        let run = self.trainer.fit(&mut handle, training_set, epochs)?;
        let evaluation = evaluation_set
            .map(|set| evaluate_model(&handle, set))
            .transpose()?;

        Ok((run, evaluation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{DataGenerator, Line},
        optimization::OptimizerKind,
        training::TrainerOptions,
    };

    fn runner(mode: ExecutionMode) -> ComparisonRunner {
        let trainer = ModelTrainer::new(TrainerOptions {
            seed: Some(11),
            ..TrainerOptions::default()
        })
        .unwrap();
        ComparisonRunner::new(trainer, mode)
    }

    fn training_set() -> SampleSet {
        DataGenerator::seeded(11)
            .generate_training_set(60, Line::new(2.0, 1.0), 10.0, 1.0)
            .unwrap()
    }

    #[test]
    fn empty_configs_fail() {
        let err = runner(ExecutionMode::Sequential)
            .run(&[], &training_set(), 10)
            .unwrap_err();
        assert!(matches!(err, LabError::EmptyConfigSet));
    }

    #[test]
    fn one_bad_learning_rate_fails_the_whole_comparison() {
        let configs = RunConfig::from_learning_rates(&[0.1, -1.0, 0.5]);
        let err = runner(ExecutionMode::Parallel)
            .run(&configs, &training_set(), 10)
            .unwrap_err();
        assert!(matches!(err, LabError::ConfigurationError(_)));
    }

    #[test]
    fn zero_epochs_fail() {
        let configs = RunConfig::from_learning_rates(&[0.1]);
        assert!(matches!(
            runner(ExecutionMode::Sequential).run(&configs, &training_set(), 0),
            Err(LabError::ConfigurationError(_))
        ));
    }

    #[test]
    fn runs_keep_config_order_and_ids() {
        let configs = RunConfig::from_learning_rates(&[0.5, 0.01, 0.1]);
        let report = runner(ExecutionMode::Parallel)
            .run(&configs, &training_set(), 15)
            .unwrap();

        let lrs: Vec<_> = report.runs().iter().map(|r| r.learning_rate()).collect();
        let ids: Vec<_> = report.runs().iter().map(|r| r.config_id()).collect();
        assert_eq!(lrs, [0.5, 0.01, 0.1]);
        assert_eq!(ids, [0, 1, 2]);
        assert!(report.runs().iter().all(|r| r.epoch_count() == 15));
    }

    #[test]
    fn evaluated_comparison_has_one_evaluation_per_run() {
        let configs = RunConfig::from_learning_rates(&[0.1, 0.5]);
        let eval_set = DataGenerator::seeded(0)
            .generate_evaluation_set(20, Line::new(2.0, 1.0), 12.0)
            .unwrap();

        let report = runner(ExecutionMode::Sequential)
            .run_with_evaluation(&configs, &training_set(), &eval_set, 20)
            .unwrap();

        assert_eq!(report.evaluations().len(), 2);
        assert_eq!(report.evaluation(1).unwrap().inputs(), eval_set.xs());
    }

    #[test]
    fn diverging_run_reports_consistent_statistics() {
        let trainer = ModelTrainer::new(TrainerOptions {
            optimizer: OptimizerKind::GradientDescent,
            seed: Some(3),
            ..TrainerOptions::default()
        })
        .unwrap();
        let configs = RunConfig::from_learning_rates(&[0.001, 1.0]);
        let eval_set = DataGenerator::seeded(0)
            .generate_evaluation_set(20, Line::new(2.0, 1.0), 12.0)
            .unwrap();

        let report = ComparisonRunner::new(trainer, ExecutionMode::Sequential)
            .run_with_evaluation(&configs, &training_set(), &eval_set, 300)
            .unwrap();

        assert!(!report.runs()[1].final_loss().is_finite());
        assert_eq!(report.best_index(), 0);
        assert_eq!(report.fastest_index(), 0);

        let diverged = report.evaluation(1).unwrap();
        assert_eq!(diverged.mae().is_nan(), diverged.max_error().is_nan());
        assert_eq!(diverged.mae().is_nan(), diverged.min_error().is_nan());
        assert!(!(diverged.max_error() < diverged.min_error()));
    }
}
