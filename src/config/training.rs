use serde::{Deserialize, Serialize};

use crate::{
    comparison::{ExecutionMode, RunConfig},
    optimization::OptimizerKind,
    training::TrainerOptions,
    LabError, Result,
};

/// How the single model of a session is trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub batch_size: usize,
    pub shuffle: bool,
    pub optimizer: OptimizerKind,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            learning_rate: 0.1,
            batch_size: 32,
            shuffle: true,
            optimizer: OptimizerKind::default(),
        }
    }
}

impl TrainingConfig {
    /// The options every trainer built from this config shares.
    pub fn trainer_options(&self, seed: Option<u64>) -> TrainerOptions {
        TrainerOptions {
            batch_size: self.batch_size,
            shuffle: self.shuffle,
            optimizer: self.optimizer,
            seed,
        }
    }

    pub(super) fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(LabError::ConfigurationError(
                "training.epochs must be greater than 0".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(LabError::ConfigurationError(
                "training.batch_size must be greater than 0".into(),
            ));
        }
        validate_learning_rate("training.learning_rate", self.learning_rate)?;

        if let OptimizerKind::Adam {
            beta1,
            beta2,
            epsilon,
        } = self.optimizer
        {
            for (name, beta) in [("beta1", beta1), ("beta2", beta2)] {
                if !(0.0..1.0).contains(&beta) {
                    return Err(LabError::ConfigurationError(format!(
                        "training.optimizer.{name} must lie in [0, 1), got {beta}"
                    )));
                }
            }
            if !epsilon.is_finite() || epsilon <= 0.0 {
                return Err(LabError::ConfigurationError(format!(
                    "training.optimizer.epsilon must be a finite positive number, got {epsilon}"
                )));
            }
        }
        Ok(())
    }
}

/// The learning rates compared against each other and how their runs are scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonConfig {
    pub learning_rates: Vec<f64>,
    pub mode: ExecutionMode,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            learning_rates: vec![0.001, 0.01, 0.1, 0.5, 1.0],
            mode: ExecutionMode::Sequential,
        }
    }
}

impl ComparisonConfig {
    pub fn run_configs(&self) -> Vec<RunConfig> {
        RunConfig::from_learning_rates(&self.learning_rates)
    }

    pub(super) fn validate(&self) -> Result<()> {
        if self.learning_rates.is_empty() {
            return Err(LabError::EmptyConfigSet);
        }
        for (i, &lr) in self.learning_rates.iter().enumerate() {
            validate_learning_rate(&format!("comparison.learning_rates[{i}]"), lr)?;
        }
        Ok(())
    }
}

fn validate_learning_rate(name: &str, learning_rate: f64) -> Result<()> {
    if !learning_rate.is_finite() || learning_rate <= 0.0 {
        return Err(LabError::ConfigurationError(format!(
            "{name} must be a finite positive number, got {learning_rate}"
        )));
    }
    Ok(())
}
