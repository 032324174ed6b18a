use ndarray::{Array1, ArrayView1};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use super::{loss::LossFn, Model};
use crate::{optimization::Optimizer, LabError, Result};

/// Standard deviation of the normal distribution the weight is initialized from.
const WEIGHT_INIT_STD_DEV: f64 = 0.05;

/// The learned parameters of a single-unit linear model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Parameters {
    pub weight: f64,
    pub bias: f64,
}

impl Parameters {
    /// Absolute distance of each parameter to the true slope and intercept.
    pub fn error_against(&self, slope: f64, intercept: f64) -> Parameters {
        Parameters {
            weight: (self.weight - slope).abs(),
            bias: (self.bias - intercept).abs(),
        }
    }
}

/// A dense layer with one input and one output unit: `y = weight * x + bias`.
///
/// The parameters are stored contiguously as `[weight, bias]` so optimizers can update them as
/// a single slice.
#[derive(Debug, Clone)]
pub struct LinearModel {
    params: [f64; 2],
}

impl LinearModel {
    /// Creates a new `LinearModel` with the given parameters.
    pub fn new(weight: f64, bias: f64) -> Self {
        Self {
            params: [weight, bias],
        }
    }

    /// Creates a new `LinearModel` with a normally distributed weight and a zero bias.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    pub fn init<R: Rng + ?Sized>(rng: &mut R) -> Result<Self> {
        let normal = Normal::new(0.0, WEIGHT_INIT_STD_DEV)
            .map_err(|e| LabError::ConfigurationError(format!("weight initializer: {e}")))?;

        Ok(Self::new(normal.sample(rng), 0.0))
    }
}

impl Model for LinearModel {
    fn size(&self) -> usize {
        self.params.len()
    }

    fn forward(&self, x: ArrayView1<f64>) -> Array1<f64> {
        let [w, b] = self.params;
        x.mapv(|x| w * x + b)
    }

    fn backprop<'a, L, O, I>(&mut self, loss_fn: &L, optimizer: &mut O, batches: I) -> Result<f64>
    where
        L: LossFn,
        O: Optimizer + ?Sized,
        I: Iterator<Item = (ArrayView1<'a, f64>, ArrayView1<'a, f64>)>,
    {
        let mut total_loss = 0.0;
        let mut total_samples = 0;

        for (x, y) in batches {
            let y_pred = self.forward(x);
            total_loss += loss_fn.loss(y_pred.view(), y) * x.len() as f64;
            total_samples += x.len();

            // d(loss)/d(y_pred) chained through y_pred = w * x + b
            let d = loss_fn.loss_prime(y_pred.view(), y);
            let grad = [(&d * &x).sum(), d.sum()];

            optimizer.update_params(&grad, &mut self.params)?;
        }

        if total_samples == 0 {
            return Err(LabError::InvalidArgument(
                "an epoch needs at least one sample".into(),
            ));
        }

        Ok(total_loss / total_samples as f64)
    }

    fn parameters(&self) -> Parameters {
        let [weight, bias] = self.params;
        Parameters { weight, bias }
    }
}
