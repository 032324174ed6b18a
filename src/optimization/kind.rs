use serde::{Deserialize, Serialize};

use super::{Adam, GradientDescent, Optimizer};

/// Selects the optimization algorithm a model is trained with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizerKind {
    Adam {
        #[serde(default = "default_beta1")]
        beta1: f64,
        #[serde(default = "default_beta2")]
        beta2: f64,
        #[serde(default = "default_epsilon")]
        epsilon: f64,
    },
    GradientDescent,
}

impl Default for OptimizerKind {
    fn default() -> Self {
        Self::Adam {
            beta1: default_beta1(),
            beta2: default_beta2(),
            epsilon: default_epsilon(),
        }
    }
}

impl OptimizerKind {
    /// Instantiates the selected optimizer.
    ///
    /// # Arguments
    /// * `len` - The amount of parameters the optimizer will update.
    /// * `learning_rate` - The step size.
    pub fn build(self, len: usize, learning_rate: f64) -> Box<dyn Optimizer + Send> {
        match self {
            Self::Adam {
                beta1,
                beta2,
                epsilon,
            } => Box::new(Adam::new(len, learning_rate, beta1, beta2, epsilon)),
            Self::GradientDescent => Box::new(GradientDescent::new(learning_rate)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Adam { .. } => "adam",
            Self::GradientDescent => "gradient_descent",
        }
    }
}

fn default_beta1() -> f64 {
    0.9
}

fn default_beta2() -> f64 {
    0.999
}

fn default_epsilon() -> f64 {
    1e-7
}
