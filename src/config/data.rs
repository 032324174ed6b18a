use serde::{Deserialize, Serialize};

use crate::{data::Line, LabError, Result};

/// What data is generated: the ground-truth line, the noisy training set and the noise-free
/// evaluation set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub train_samples: usize,
    pub slope: f64,
    pub intercept: f64,
    /// Exclusive upper bound of the training inputs.
    pub x_max: f64,
    /// Half width of the uniform noise added to the training targets.
    pub noise: f64,
    pub eval_samples: usize,
    /// Inclusive upper bound of the evaluation inputs. Past `x_max` the points extrapolate.
    pub eval_x_max: f64,
    /// `None` seeds every random source from entropy.
    pub seed: Option<u64>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            train_samples: 100,
            slope: 2.0,
            intercept: 1.0,
            x_max: 10.0,
            noise: 1.0,
            eval_samples: 20,
            eval_x_max: 12.0,
            seed: None,
        }
    }
}

impl DataConfig {
    pub fn line(&self) -> Line {
        Line::new(self.slope, self.intercept)
    }

    pub(super) fn validate(&self) -> Result<()> {
        if self.train_samples == 0 {
            return Err(LabError::InvalidArgument(
                "data.train_samples must be greater than 0".into(),
            ));
        }
        if self.eval_samples < 2 {
            return Err(LabError::InvalidArgument(format!(
                "data.eval_samples must be at least 2, got {}",
                self.eval_samples
            )));
        }
        if !self.slope.is_finite() || !self.intercept.is_finite() {
            return Err(LabError::InvalidArgument(
                "data.slope and data.intercept must be finite".into(),
            ));
        }
        for (name, value) in [("x_max", self.x_max), ("eval_x_max", self.eval_x_max)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LabError::InvalidArgument(format!(
                    "data.{name} must be a finite positive number, got {value}"
                )));
            }
        }
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(LabError::InvalidArgument(format!(
                "data.noise must be a finite non-negative number, got {}",
                self.noise
            )));
        }
        Ok(())
    }
}
